use crate::core_fs::FsError;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

/// Handles the DELE (Delete File) FTP command.
pub struct Dele;

#[async_trait]
impl CommandHandler for Dele {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let (resolved, metadata) = match session.build_path(&request.argument).await {
            Ok(found) => found,
            Err(e) => return session.reply_fs_error(&e).await,
        };
        if metadata.is_dir() {
            return session
                .reply_fs_error(&FsError::NotAFile(resolved.virtual_path))
                .await;
        }

        match tokio::fs::remove_file(&resolved.real).await {
            Ok(()) => {
                info!("[{}] Deleted {}", session.remote_addr(), resolved.virtual_path);
                session
                    .reply(
                        reply::REQUESTED_FILE_ACTION_OKAY,
                        &format!("Deleted {}", resolved.virtual_path),
                    )
                    .await
            }
            Err(source) => {
                warn!("[{}] Failed to delete {:?}: {}", session.remote_addr(), resolved.real, source);
                session
                    .reply_fs_error(&FsError::Io {
                        path: resolved.virtual_path,
                        source,
                    })
                    .await
            }
        }
    }
}
