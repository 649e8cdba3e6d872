use crate::constants::{ATTRIBUTE_DATA_TYPE, DATA_TYPE_ASCII, DATA_TYPE_BINARY};
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::info;

/// Maps a TYPE argument onto the stored data type.
///
/// `A` (optionally `A N`) is ASCII, `I` and `L 8` are binary. Anything else
/// is unsupported.
pub fn parse_type(argument: &str) -> Option<&'static str> {
    let params: Vec<String> = argument
        .split_whitespace()
        .map(|p| p.to_ascii_uppercase())
        .collect();
    match params.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["A"] | ["A", "N"] => Some(DATA_TYPE_ASCII),
        ["I"] | ["L", "8"] => Some(DATA_TYPE_BINARY),
        _ => None,
    }
}

/// Handles the TYPE FTP command. Transfers are always byte-for-byte; the
/// negotiated type is only recorded for STAT.
pub struct Type;

#[async_trait]
impl CommandHandler for Type {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        if request.argument.trim().is_empty() {
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        }

        match parse_type(&request.argument) {
            Some(data_type) => {
                session.set_attribute(ATTRIBUTE_DATA_TYPE, data_type);
                info!("[{}] Transfer type set to {}", session.remote_addr(), data_type);
                session
                    .reply(reply::COMMAND_OKAY, &format!("Type set to {}.", data_type))
                    .await
            }
            None => {
                session
                    .reply(
                        reply::NOT_IMPLEMENTED_FOR_PARAMETER,
                        &format!(
                            "Command TYPE not implemented for the parameter {}.",
                            request.argument
                        ),
                    )
                    .await
            }
        }
    }
}
