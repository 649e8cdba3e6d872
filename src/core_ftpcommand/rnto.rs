use crate::constants::ATTRIBUTE_RENAME_FROM;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

/// RNTO: completes a rename started with RNFR. The pending source is
/// consumed whatever the outcome.
pub struct Rnto;

#[async_trait]
impl CommandHandler for Rnto {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let Some(from) = session.remove_attribute(ATTRIBUTE_RENAME_FROM) else {
            return session
                .reply(reply::BAD_SEQUENCE_OF_COMMANDS, "RNFR required first.")
                .await;
        };
        if request.argument.trim().is_empty() {
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        }

        let (source, target) = match (
            session.resolve_path(&from),
            session.resolve_path(&request.argument),
        ) {
            (Ok(source), Ok(target)) => (source, target),
            (Err(e), _) | (_, Err(e)) => return session.reply_fs_error(&e).await,
        };

        match tokio::fs::rename(&source.real, &target.real).await {
            Ok(()) => {
                info!(
                    "[{}] Renamed {} to {}",
                    session.remote_addr(),
                    source.virtual_path,
                    target.virtual_path
                );
                session
                    .reply(reply::REQUESTED_FILE_ACTION_OKAY, "Rename successful.")
                    .await
            }
            Err(e) => {
                warn!(
                    "[{}] Rename {:?} -> {:?} failed: {}",
                    session.remote_addr(),
                    source.real,
                    target.real,
                    e
                );
                session
                    .reply(reply::FILE_NAME_NOT_ALLOWED, "Rename failed.")
                    .await
            }
        }
    }
}
