use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::{CommandHandler, SubNamespace};
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::warn;

/// OPTS: dispatches on the option name through the OPTS sub-table.
pub struct Opts;

#[async_trait]
impl CommandHandler for Opts {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let Some(option) = request.sub_command() else {
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        };

        let handler = session
            .context()
            .commands
            .get_sub(SubNamespace::Opts, &option);
        match handler {
            Some(handler) => handler.execute(session, request).await,
            None => {
                warn!("Unknown OPTS option: {}", option);
                session
                    .reply(
                        reply::NOT_IMPLEMENTED_FOR_PARAMETER,
                        &format!("OPTS {} not implemented.", option),
                    )
                    .await
            }
        }
    }
}
