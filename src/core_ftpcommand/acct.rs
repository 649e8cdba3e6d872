use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

pub struct Acct;

#[async_trait]
impl CommandHandler for Acct {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        session
            .reply(
                reply::COMMAND_SUPERFLUOUS,
                "Command ACCT not implemented, superfluous at this site.",
            )
            .await
    }
}

/// ALLO: storage is never reserved up front.
pub struct Allo;

#[async_trait]
impl CommandHandler for Allo {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        session
            .reply(
                reply::COMMAND_SUPERFLUOUS,
                "ALLO command ignored, superfluous at this site.",
            )
            .await
    }
}
