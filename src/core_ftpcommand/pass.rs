use crate::constants::ATTRIBUTE_USER_ARGUMENT;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

/// Handles the PASS FTP command.
///
/// Checks the pending user name and password against the configured
/// authenticator. The failure reason is logged but never sent to the client.
///
/// # Returns
///
/// Result<(), std::io::Error>; only control channel failures are errors.
pub struct Pass;

#[async_trait]
impl CommandHandler for Pass {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        if session.is_logged_in() {
            return session
                .reply(reply::COMMAND_SUPERFLUOUS, "Already logged-in.")
                .await;
        }

        let Some(username) = session.get_attribute(ATTRIBUTE_USER_ARGUMENT).map(str::to_string)
        else {
            return session
                .reply(reply::BAD_SEQUENCE_OF_COMMANDS, "Login with USER first.")
                .await;
        };

        let authenticator = Arc::clone(&session.context().authenticator);
        match authenticator.authenticate(&username, &request.argument).await {
            Ok(user) => {
                info!(
                    "[{}] User {} logged in, home {:?}",
                    session.remote_addr(),
                    user.username,
                    user.home_dir
                );
                session.login(user);
                session
                    .reply(reply::USER_LOGGED_IN, "User logged in, proceed.")
                    .await
            }
            Err(e) => {
                warn!("[{}] Login failed for {}: {}", session.remote_addr(), username, e);
                session
                    .reply(reply::NOT_LOGGED_IN, "Authentication failed.")
                    .await
            }
        }
    }
}
