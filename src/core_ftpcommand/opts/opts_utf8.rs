use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

/// OPTS UTF8 [ON]. Paths are always exchanged as UTF-8, so there is nothing
/// to switch off.
pub struct OptsUtf8;

#[async_trait]
impl CommandHandler for OptsUtf8 {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let value = request.sub_argument();
        if value.is_empty() || value.eq_ignore_ascii_case("ON") {
            session.reply(reply::COMMAND_OKAY, "Always in UTF8 mode.").await
        } else {
            session
                .reply(
                    reply::NOT_IMPLEMENTED_FOR_PARAMETER,
                    &format!("UTF8 {} not supported.", value),
                )
                .await
        }
    }
}
