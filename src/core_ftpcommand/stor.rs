use crate::core_fs::FsError;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{error, info};
use tokio::fs::OpenOptions;

/// Handles STOR and APPE. STOR truncates an existing file, APPE appends to it;
/// both create the file when missing.
pub struct Stor {
    append: bool,
}

impl Stor {
    pub fn store() -> Self {
        Self { append: false }
    }

    pub fn append() -> Self {
        Self { append: true }
    }
}

#[async_trait]
impl CommandHandler for Stor {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        if request.argument.trim().is_empty() {
            session.close_data_channel().await;
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        }

        let resolved = match session.resolve_path(&request.argument) {
            Ok(resolved) => resolved,
            Err(e) => {
                session.close_data_channel().await;
                return session.reply_fs_error(&e).await;
            }
        };
        let is_dir = tokio::fs::metadata(&resolved.real)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir || resolved.virtual_path == "/" {
            session.close_data_channel().await;
            return session
                .reply_fs_error(&FsError::NotAFile(resolved.virtual_path))
                .await;
        }

        if !session.require_data_channel().await? {
            return Ok(());
        }

        let mut file = match OpenOptions::new()
            .write(true)
            .create(true)
            .append(self.append)
            .truncate(!self.append)
            .open(&resolved.real)
            .await
        {
            Ok(file) => file,
            Err(source) => {
                error!("Cannot open {:?} for writing: {}", resolved.real, source);
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
            .reply(reply::FILE_STATUS_OKAY, "Ok to send data.")
            .await?;
        info!(
            "[{}] {} file: {}",
            session.remote_addr(),
            if self.append { "Appending to" } else { "Receiving" },
            resolved.virtual_path
        );
        session.read_to_stream(&mut file).await
    }
}
