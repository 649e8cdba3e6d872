//! Security negotiation verbs. No TLS layer is available, so AUTH is refused
//! and the protection commands that must follow it are out of sequence.

use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::debug;

pub struct Auth;

#[async_trait]
impl CommandHandler for Auth {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        debug!("[{}] Refusing AUTH {}", session.remote_addr(), request.argument);
        session
            .reply(reply::REQUEST_DENIED, "TLS not available.")
            .await
    }
}

pub struct Pbsz;

#[async_trait]
impl CommandHandler for Pbsz {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        session
            .reply(
                reply::BAD_SEQUENCE_OF_COMMANDS,
                "PBSZ requires a security exchange (AUTH) first.",
            )
            .await
    }
}

pub struct Prot;

#[async_trait]
impl CommandHandler for Prot {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        session
            .reply(
                reply::BAD_SEQUENCE_OF_COMMANDS,
                "PROT requires a security exchange (AUTH) first.",
            )
            .await
    }
}
