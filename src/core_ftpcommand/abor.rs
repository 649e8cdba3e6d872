use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::info;

/// ABOR: drops any data channel, open or not, and always succeeds.
pub struct Abor;

#[async_trait]
impl CommandHandler for Abor {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        if session.has_data_channel() {
            info!("[{}] Aborting data connection", session.remote_addr());
        }
        session.close_data_channel().await;
        session
            .reply(reply::CLOSING_DATA_CONNECTION, "ABOR command successful.")
            .await
    }
}
