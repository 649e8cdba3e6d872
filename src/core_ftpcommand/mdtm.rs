use crate::core_fs::FsError;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Timestamp layout shared by MDTM and MFMT (RFC 3659).
pub const TIME_VAL_FORMAT: &str = "%Y%m%d%H%M%S";

/// MDTM: modification time of a file, in UTC.
pub struct Mdtm;

#[async_trait]
impl CommandHandler for Mdtm {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let (resolved, metadata) = match session.build_path(&request.argument).await {
            Ok(found) => found,
            Err(e) => return session.reply_fs_error(&e).await,
        };

        if !metadata.is_file() {
            return session
                .reply_fs_error(&FsError::NotAFile(resolved.virtual_path))
                .await;
        }

        match metadata.modified() {
            Ok(modified) => {
                let stamp = DateTime::<Utc>::from(modified).format(TIME_VAL_FORMAT);
                session
                    .reply(reply::FILE_STATUS, &stamp.to_string())
                    .await
            }
            Err(source) => {
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
