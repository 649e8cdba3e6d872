use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::core_network::datachannel::{normalize_ip, DataChannel};
use crate::core_network::error::DataChannelError;
use crate::session::Session;
use async_trait::async_trait;
use log::{error, info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};

/// Parses the `h1,h2,h3,h4,p1,p2` host-port argument of PORT.
pub fn decode_socket(arg: &str) -> Result<SocketAddrV4, DataChannelError> {
    let malformed = || DataChannelError::SocketFormat(arg.to_string());

    let fields: Vec<&str> = arg.trim().split(',').collect();
    if fields.len() != 6 {
        return Err(malformed());
    }

    let mut bytes = [0u8; 6];
    for (byte, field) in bytes.iter_mut().zip(&fields) {
        *byte = field.trim().parse::<u8>().map_err(|_| malformed())?;
    }

    let ip = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
    let port = (bytes[4] as u16) << 8 | bytes[5] as u16;
    if port == 0 {
        return Err(malformed());
    }
    Ok(SocketAddrV4::new(ip, port))
}

/// Formats an address the way PASV advertises it.
pub fn encode_socket(addr: &SocketAddrV4) -> String {
    let [h1, h2, h3, h4] = addr.ip().octets();
    format!(
        "{},{},{},{},{},{}",
        h1,
        h2,
        h3,
        h4,
        addr.port() >> 8,
        addr.port() & 0xff
    )
}

/// PORT: opens an active data connection to the control peer.
///
/// The address must belong to the peer of the control connection; anything
/// else is answered like a malformed argument.
pub struct Port;

#[async_trait]
impl CommandHandler for Port {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let requested = match decode_socket(&request.argument) {
            Ok(addr) => addr,
            Err(e) => {
                warn!("[{}] {}", session.remote_addr(), e);
                let (code, message) = e.to_ftp_response();
                return session.reply(code, &message).await;
            }
        };

        let peer = normalize_ip(session.remote_addr().ip());
        if IpAddr::V4(*requested.ip()) != peer {
            let e = DataChannelError::AddressMismatch {
                requested: IpAddr::V4(*requested.ip()),
                peer,
            };
            warn!("[{}] Refused PORT: {}", session.remote_addr(), e);
            let (code, message) = e.to_ftp_response();
            return session.reply(code, &message).await;
        }

        info!(
            "[{}] Received PORT command with IP: {} and port: {}",
            session.remote_addr(),
            requested.ip(),
            requested.port()
        );

        match DataChannel::connect(SocketAddr::V4(requested)).await {
            Ok(channel) => {
                session.set_data_channel(channel).await;
                session
                    .reply(reply::COMMAND_OKAY, "PORT command successful.")
                    .await
            }
            Err(e) => {
                error!("[{}] Failed to connect to {}: {}", session.remote_addr(), requested, e);
                let (code, message) = e.to_ftp_response();
                session.reply(code, &message).await
            }
        }
    }
}
