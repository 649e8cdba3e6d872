use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::info;

/// QUIT: says goodbye and ends the session after this command.
pub struct Quit;

#[async_trait]
impl CommandHandler for Quit {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        info!("[{}] Client requested QUIT", session.remote_addr());
        let result = session
            .reply(reply::CLOSING_CONTROL_CONNECTION, "Goodbye.")
            .await;
        session.close();
        result
    }
}
