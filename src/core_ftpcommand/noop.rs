use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

pub struct Noop;

#[async_trait]
impl CommandHandler for Noop {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        session.reply(reply::COMMAND_OKAY, "Command NOOP okay.").await
    }
}
