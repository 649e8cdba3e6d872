use std::net::IpAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Shutdown was requested; not a failure.
    #[error("Server closed")]
    ServerClosed,

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Accept failed: {0}")]
    Accept(#[source] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

#[derive(Error, Debug)]
pub enum DataChannelError {
    #[error("Malformed host-port argument: {0}")]
    SocketFormat(String),

    #[error("Data address {requested} does not match peer {peer}")]
    AddressMismatch { requested: IpAddr, peer: IpAddr },

    #[error("No passive port available")]
    NoPassivePort,

    #[error("Data connection already closed")]
    Closed,

    #[error("Data connection I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataChannelError {
    pub fn to_ftp_response(&self) -> (u16, String) {
        use crate::core_ftpcommand::reply;
        match self {
            DataChannelError::SocketFormat(_) | DataChannelError::AddressMismatch { .. } => (
                reply::SYNTAX_ERROR_IN_ARGUMENTS,
                "Syntax error in parameters or arguments.".to_string(),
            ),
            DataChannelError::NoPassivePort
            | DataChannelError::Closed
            | DataChannelError::Io(_) => (
                reply::CANT_OPEN_DATA_CONNECTION,
                "Can't open data connection.".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_mapping() {
        let mismatch = DataChannelError::AddressMismatch {
            requested: "10.0.0.1".parse().unwrap(),
            peer: "127.0.0.1".parse().unwrap(),
        };
        assert_eq!(mismatch.to_ftp_response().0, 501);
        assert_eq!(
            DataChannelError::SocketFormat("1,2".into()).to_ftp_response().0,
            501
        );

        let refused = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        assert_eq!(DataChannelError::from(refused).to_ftp_response().0, 425);
    }
}
