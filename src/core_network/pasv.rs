use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::core_network::datachannel::{normalize_ip, DataChannel};
use crate::core_network::error::DataChannelError;
use crate::core_network::port::encode_socket;
use crate::session::Session;
use async_trait::async_trait;
use log::{error, info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};

/// Binds a passive listener on the control connection's local address and
/// installs it as the session's data channel.
///
/// The previous channel is closed before binding so its port is free again
/// for the new listener, and is gone even when the bind fails.
async fn open_passive(session: &mut Session) -> Result<SocketAddr, DataChannelError> {
    session.close_data_channel().await;

    let bind_ip = normalize_ip(session.local_addr().ip());
    let ports = session.config().passive_ports();

    let channel = DataChannel::listen(bind_ip, ports, session.remote_addr().ip()).await?;
    let addr = channel.negotiated_addr();
    session.set_data_channel(channel).await;
    Ok(addr)
}

/// IPv4 address announced in the 227 reply.
fn advertised_ip(session: &Session) -> Option<Ipv4Addr> {
    match session.config().pasv_ip() {
        Ok(Some(ip)) => return Some(ip),
        Ok(None) => {}
        Err(e) => warn!("Ignoring pasv_address: {}", e),
    }
    match normalize_ip(session.local_addr().ip()) {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    }
}

/// PASV: opens a passive listener and announces it as a host-port sextet.
pub struct Pasv;

#[async_trait]
impl CommandHandler for Pasv {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        let Some(ip) = advertised_ip(session) else {
            warn!("[{}] PASV requested over IPv6 control connection", session.remote_addr());
            return session
                .reply(
                    reply::CANT_OPEN_DATA_CONNECTION,
                    "PASV needs an IPv4 address, use EPSV.",
                )
                .await;
        };

        match open_passive(session).await {
            Ok(addr) => {
                let announced = SocketAddrV4::new(ip, addr.port());
                info!("[{}] PASV listening on {} as {}", session.remote_addr(), addr, announced);
                session
                    .reply(
                        reply::ENTERING_PASSIVE_MODE,
                        &format!("Entering Passive Mode ({}).", encode_socket(&announced)),
                    )
                    .await
            }
            Err(e) => {
                error!("[{}] PASV failed: {}", session.remote_addr(), e);
                let (code, message) = e.to_ftp_response();
                session.reply(code, &message).await
            }
        }
    }
}

/// EPSV: like PASV but only the port is announced, `(|||port|)`.
pub struct Epsv;

#[async_trait]
impl CommandHandler for Epsv {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        match request.argument.trim().to_ascii_uppercase().as_str() {
            "" | "1" | "2" => {}
            "ALL" => {
                return session
                    .reply(reply::COMMAND_OKAY, "EPSV ALL command successful.")
                    .await;
            }
            _ => {
                return session
                    .reply(
                        reply::NETWORK_PROTOCOL_NOT_SUPPORTED,
                        "Network protocol not supported, use (1,2)",
                    )
                    .await;
            }
        }

        match open_passive(session).await {
            Ok(addr) => {
                info!("[{}] EPSV listening on {}", session.remote_addr(), addr);
                session
                    .reply(
                        reply::ENTERING_EXTENDED_PASSIVE_MODE,
                        &format!("Entering Extended Passive Mode (|||{}|)", addr.port()),
                    )
                    .await
            }
            Err(e) => {
                error!("[{}] EPSV failed: {}", session.remote_addr(), e);
                let (code, message) = e.to_ftp_response();
                session.reply(code, &message).await
            }
        }
    }
}
