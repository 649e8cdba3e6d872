use crate::core_fs::FsError;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

/// Handles the RMD (Remove Directory) FTP command. The directory must be
/// empty and the virtual root can never be removed.
pub struct Rmd;

#[async_trait]
impl CommandHandler for Rmd {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        if request.argument.trim().is_empty() {
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        }

        let (resolved, metadata) = match session.build_path(&request.argument).await {
            Ok(found) => found,
            Err(e) => return session.reply_fs_error(&e).await,
        };
        if !metadata.is_dir() {
            return session
                .reply_fs_error(&FsError::NotADirectory(resolved.virtual_path))
                .await;
        }
        if resolved.virtual_path == "/" {
            return session
                .reply(
                    reply::REQUESTED_ACTION_NOT_TAKEN,
                    "Cannot remove the root directory.",
                )
                .await;
        }

        match tokio::fs::remove_dir(&resolved.real).await {
            Ok(()) => {
                info!("[{}] Removed directory {}", session.remote_addr(), resolved.virtual_path);
                session
                    .reply(
                        reply::REQUESTED_FILE_ACTION_OKAY,
                        &format!("Removed directory {}", resolved.virtual_path),
                    )
                    .await
            }
            Err(e) => {
                warn!("[{}] Failed to remove {:?}: {}", session.remote_addr(), resolved.real, e);
                session
                    .reply(
                        reply::REQUESTED_ACTION_NOT_TAKEN,
                        "Failed to remove directory.",
                    )
                    .await
            }
        }
    }
}
