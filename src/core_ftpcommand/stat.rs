use crate::constants::{ATTRIBUTE_DATA_TYPE, DATA_TYPE_ASCII};
use crate::core_fs::{get_file_list, FsError, LongListFormatter};
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

fn session_status(session: &Session) -> String {
    let user = session
        .user()
        .map(|user| user.username.as_str())
        .unwrap_or("-");
    format!(
        "{} server status:\n Connected to {}\n Logged in as {}\n TYPE: {}\n Connected since {}\n Data connection: {}\n {} bytes sent, {} bytes received\nEnd of status",
        session.config().name,
        session.remote_addr(),
        user,
        session
            .get_attribute(ATTRIBUTE_DATA_TYPE)
            .unwrap_or(DATA_TYPE_ASCII),
        session.connect_at().format("%Y-%m-%d %H:%M:%S"),
        if session.has_data_channel() { "negotiated" } else { "none" },
        session.bytes_sent(),
        session.bytes_received(),
    )
}

/// STAT without argument reports the session; with a path it sends a long
/// listing over the control connection instead of a data channel.
pub struct Stat;

#[async_trait]
impl CommandHandler for Stat {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        if request.argument.trim().is_empty() {
            let status = session_status(session);
            return session.reply(reply::SYSTEM_STATUS, &status).await;
        }

        let (resolved, _) = match session.build_path(&request.argument).await {
            Ok(found) => found,
            Err(e) => return session.reply_fs_error(&e).await,
        };

        match get_file_list(&resolved.real, &LongListFormatter).await {
            Ok(listing) => {
                let listing = String::from_utf8_lossy(&listing).replace("\r\n", "\n");
                let message = format!(
                    "Status of {}:\n{}End of status",
                    resolved.virtual_path, listing
                );
                session.reply(reply::FILE_STATUS, &message).await
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
