use crate::constants::ATTRIBUTE_USER_ARGUMENT;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

/// Handles the USER FTP command.
///
/// Stores the name until PASS arrives. Once logged in, repeating the current
/// name is acknowledged and any other name is refused: a session never
/// switches accounts.
pub struct User;

#[async_trait]
impl CommandHandler for User {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let username = request.argument.trim();
        if username.is_empty() {
            warn!("USER command received with no arguments");
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        }

        if session.is_logged_in() {
            let same_user = session
                .user()
                .map(|user| user.username == username)
                .unwrap_or(false);
            return if same_user {
                session.reply(reply::USER_LOGGED_IN, "Already logged-in.").await
            } else {
                session.reply(reply::NOT_LOGGED_IN, "Invalid user name.").await
            };
        }

        session.set_attribute(ATTRIBUTE_USER_ARGUMENT, username);
        info!("[{}] User name received: {}", session.remote_addr(), username);
        session
            .reply(
                reply::USER_NAME_OKAY_NEED_PASSWORD,
                "User name okay, need password.",
            )
            .await
    }
}
