use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

/// Accepts only `supported` (case-insensitive) for a single-letter parameter
/// command such as MODE or STRU.
async fn single_parameter(
    session: &mut Session,
    request: &FtpRequest,
    supported: &str,
    label: &str,
) -> std::io::Result<()> {
    let argument = request.argument.trim();
    if argument.is_empty() {
        return session
            .reply(
                reply::SYNTAX_ERROR_IN_ARGUMENTS,
                "Syntax error in parameters or arguments.",
            )
            .await;
    }
    if argument.eq_ignore_ascii_case(supported) {
        session
            .reply(
                reply::COMMAND_OKAY,
                &format!("{} set to {}.", label, supported),
            )
            .await
    } else {
        session
            .reply(
                reply::NOT_IMPLEMENTED_FOR_PARAMETER,
                &format!(
                    "Command {} not implemented for the parameter {}.",
                    request.command, argument
                ),
            )
            .await
    }
}

/// MODE: stream mode only.
pub struct Mode;

#[async_trait]
impl CommandHandler for Mode {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        single_parameter(session, request, "S", "Mode").await
    }
}

/// STRU: file structure only.
pub struct Stru;

#[async_trait]
impl CommandHandler for Stru {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        single_parameter(session, request, "F", "Structure").await
    }
}
