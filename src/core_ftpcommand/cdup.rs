use crate::core_ftpcommand::cwd::change_dir;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;

/// CDUP / XCUP: CWD to the parent directory. At `/` this stays at `/`.
pub struct Cdup;

#[async_trait]
impl CommandHandler for Cdup {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        change_dir(session, "..").await
    }
}
