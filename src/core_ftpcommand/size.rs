// core_ftpcommand/size.rs

use crate::core_fs::FsError;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::info;

/// Handles the SIZE (File Size) FTP command.
///
/// Replies 213 with the exact byte length of a regular file. Directories are
/// refused with "Not a plain file." and missing paths with "No such file or
/// directory.".
pub struct Size;

#[async_trait]
impl CommandHandler for Size {
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

        let file_size = metadata.len();
        info!("File size for {} is {}", resolved.virtual_path, file_size);
        session
            .reply(reply::FILE_STATUS, &file_size.to_string())
            .await
    }
}
