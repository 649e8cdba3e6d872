use crate::core_fs::{get_file_list, FsError, ListFormatter, LongListFormatter, NameListFormatter};
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

/// Drops leading `ls` style option tokens (`-la`, `-a`), which clients send
/// even though the listing format is fixed.
pub fn strip_list_options(argument: &str) -> &str {
    let mut rest = argument.trim_start();
    while rest.starts_with('-') {
        rest = match rest.find(char::is_whitespace) {
            Some(idx) => rest[idx..].trim_start(),
            None => "",
        };
    }
    rest
}

/// LIST and NLST. They differ only in the formatter.
pub struct List {
    formatter: Box<dyn ListFormatter>,
}

impl List {
    pub fn long() -> Self {
        Self {
            formatter: Box::new(LongListFormatter),
        }
    }

    pub fn names() -> Self {
        Self {
            formatter: Box::new(NameListFormatter),
        }
    }
}

#[async_trait]
impl CommandHandler for List {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let target = strip_list_options(&request.argument);

        let (resolved, _) = match session.build_path(target).await {
            Ok(found) => found,
            Err(e) => {
                session.close_data_channel().await;
                return session.reply_fs_error(&e).await;
            }
        };

        let listing = match get_file_list(&resolved.real, self.formatter.as_ref()).await {
            Ok(listing) => listing,
            Err(source) => {
                warn!("Failed to list {:?}: {}", resolved.real, source);
                session.close_data_channel().await;
                return session
                    .reply_fs_error(&FsError::Io {
                        path: resolved.virtual_path,
                        source,
                    })
                    .await;
            }
        };

        if !session.require_data_channel().await? {
            return Ok(());
        }

        session
            .reply(
                reply::FILE_STATUS_OKAY,
                "Opening ASCII mode data connection for file list",
            )
            .await?;
        info!(
            "[{}] {} {} ({} bytes)",
            session.remote_addr(),
            request.command,
            resolved.virtual_path,
            listing.len()
        );
        session.write_data(&listing).await
    }
}
