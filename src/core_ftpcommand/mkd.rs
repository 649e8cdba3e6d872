use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

/// Handles the MKD (Make Directory) FTP command.
///
/// Only the last path component is created; a missing parent is an error.
pub struct Mkd;

#[async_trait]
impl CommandHandler for Mkd {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        if request.argument.trim().is_empty() {
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        }

        let resolved = match session.resolve_path(&request.argument) {
            Ok(resolved) => resolved,
            Err(e) => return session.reply_fs_error(&e).await,
        };
        if resolved.virtual_path == "/" {
            return session
                .reply(reply::REQUESTED_ACTION_NOT_TAKEN, "Directory already exists.")
                .await;
        }

        match tokio::fs::create_dir(&resolved.real).await {
            Ok(()) => {
                info!("[{}] Created directory {}", session.remote_addr(), resolved.virtual_path);
                session
                    .reply(
                        reply::PATHNAME_CREATED,
                        &format!("\"{}\" directory created.", resolved.virtual_path),
                    )
                    .await
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                session
                    .reply(reply::REQUESTED_ACTION_NOT_TAKEN, "Directory already exists.")
                    .await
            }
            Err(e) => {
                warn!("[{}] Failed to create {:?}: {}", session.remote_addr(), resolved.real, e);
                session
                    .reply(
                        reply::REQUESTED_ACTION_NOT_TAKEN,
                        "Failed to create directory.",
                    )
                    .await
            }
        }
    }
}
