use crate::constants::ATTRIBUTE_RENAME_FROM;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

/// RNFR: remembers an existing source path for the following RNTO.
pub struct Rnfr;

#[async_trait]
impl CommandHandler for Rnfr {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        if request.argument.trim().is_empty() {
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        }

        match session.build_path(&request.argument).await {
            Ok((resolved, _)) => {
                session.set_attribute(ATTRIBUTE_RENAME_FROM, &resolved.virtual_path);
                session
                    .reply(
                        reply::FILE_ACTION_PENDING,
                        "File exists, ready for destination name.",
                    )
                    .await
            }
            Err(e) => {
                session.remove_attribute(ATTRIBUTE_RENAME_FROM);
                session.reply_fs_error(&e).await
            }
        }
    }
}
