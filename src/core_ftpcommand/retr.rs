use crate::core_fs::FsError;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{error, info, warn};
use tokio::fs::File;

/// Handles the RETR (Retrieve) FTP command.
///
/// Streams a regular file over the negotiated data channel. The channel is
/// closed on every path out of this handler, successful or not.
///
/// # Arguments
///
/// * `session` - The session owning the data channel.
/// * `request` - The request; its argument is the file to retrieve.
pub struct Retr;

#[async_trait]
impl CommandHandler for Retr {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        if request.argument.trim().is_empty() {
            warn!("RETR command received with no arguments");
            session.close_data_channel().await;
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        }

        let (resolved, metadata) = match session.build_path(&request.argument).await {
            Ok(found) => found,
            Err(e) => {
                session.close_data_channel().await;
                return session.reply_fs_error(&e).await;
            }
        };
        if !metadata.is_file() {
            session.close_data_channel().await;
            return session
                .reply_fs_error(&FsError::NotAFile(resolved.virtual_path))
                .await;
        }

        if !session.require_data_channel().await? {
            return Ok(());
        }

        let mut file = match File::open(&resolved.real).await {
            Ok(file) => file,
            Err(source) => {
                error!("File could not be opened: {:?}, error: {}", resolved.real, source);
                session.close_data_channel().await;
                return session
                    .reply_fs_error(&FsError::Io {
                        path: resolved.virtual_path,
                        source,
                    })
                    .await;
            }
        };

        session
            .reply(
                reply::FILE_STATUS_OKAY,
                &format!(
                    "Opening data connection for {} ({} bytes).",
                    resolved.virtual_path,
                    metadata.len()
                ),
            )
            .await?;
        info!("[{}] Sending file: {}", session.remote_addr(), resolved.virtual_path);
        session.write_from_stream(&mut file).await
    }
}
