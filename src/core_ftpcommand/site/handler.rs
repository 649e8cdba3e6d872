use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::{CommandHandler, SubNamespace};
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

/// SITE: dispatches on the first argument token through the SITE sub-table.
///
/// A bare SITE is answered with a hint; an unknown sub-command gets 504 so
/// clients can tell it apart from an unknown verb.
pub struct Site;

#[async_trait]
impl CommandHandler for Site {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let Some(subcommand) = request.sub_command() else {
            return session
                .reply(
                    reply::COMMAND_OKAY,
                    "Command SITE okay. Use SITE HELP to get more information.",
                )
                .await;
        };

        let handler = session
            .context()
            .commands
            .get_sub(SubNamespace::Site, &subcommand);
        match handler {
            Some(handler) => {
                info!("Handling SITE {} command with args: {:?}", subcommand, request.sub_argument());
                handler.execute(session, request).await
            }
            None => {
                warn!("Unknown SITE subcommand: {}", subcommand);
                session
                    .reply(
                        reply::NOT_IMPLEMENTED_FOR_PARAMETER,
                        &format!("Command SITE not implemented for {}", subcommand),
                    )
                    .await
            }
        }
    }
}
