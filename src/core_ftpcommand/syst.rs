use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

pub struct Syst;

#[async_trait]
impl CommandHandler for Syst {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        let message = format!("UNIX Type: {}", session.config().name);
        session.reply(reply::NAME_SYSTEM_TYPE, &message).await
    }
}
