use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

/// PWD / XPWD
pub struct Pwd;

#[async_trait]
impl CommandHandler for Pwd {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        let message = format!("\"{}\" is current directory.", session.current_dir());
        session.reply(reply::PATHNAME_CREATED, &message).await
    }
}
