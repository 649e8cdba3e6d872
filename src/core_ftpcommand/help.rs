use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

const VERBS_PER_LINE: usize = 8;

/// HELP lists the registered verbs; `HELP <verb>` tells whether one is known.
pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let topic = request.argument.trim().to_ascii_uppercase();
        let commands = &session.context().commands;

        let (code, message) = if topic.is_empty() {
            let mut message = String::from("The following commands are recognized:");
            for row in commands.verbs().chunks(VERBS_PER_LINE) {
                message.push_str("\n ");
                message.push_str(
                    &row.iter()
                        .map(|verb| format!("{:<5}", verb))
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }
            message.push_str("\nHelp OK.");
            (reply::HELP_MESSAGE, message)
        } else if commands.get(&topic).is_some() {
            (reply::HELP_MESSAGE, format!("Syntax: {} is supported.", topic))
        } else {
            (
                reply::COMMAND_NOT_IMPLEMENTED,
                format!("Unknown command {}.", topic),
            )
        };

        session.reply(code, &message).await
    }
}
