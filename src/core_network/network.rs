use crate::core_network::error::ServerError;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, error, info, warn};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const MAX_ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// Accept errors worth retrying instead of stopping the server.
pub fn is_temporary(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    ) || is_fd_exhaustion(err)
}

// ENFILE / EMFILE
fn is_fd_exhaustion(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(23) | Some(24)) && cfg!(unix)
}

/// Accepts control connections until `shutdown` is cancelled.
///
/// Every connection gets its own task running [`Session::handle`]. Returns
/// [`ServerError::ServerClosed`] when the loop ended because of a shutdown
/// request; sessions already running are left to finish on their own.
pub async fn accept_loop(
    listener: TcpListener,
    context: Arc<ServerContext>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let mut backoff = Duration::ZERO;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, closing listener");
                return Err(ServerError::ServerClosed);
            }
            accepted = listener.accept() => match accepted {
                Ok((socket, addr)) => {
                    backoff = Duration::ZERO;
                    debug!("New connection from {}", addr);

                    let context = Arc::clone(&context);
                    tokio::spawn(async move {
                        match Session::new(socket, context) {
                            Ok(session) => session.handle().await,
                            Err(e) => warn!("Dropping connection from {}: {}", addr, e),
                        }
                    });
                }
                Err(e) if is_temporary(&e) => {
                    backoff = if backoff.is_zero() {
                        Duration::from_millis(5)
                    } else {
                        (backoff * 2).min(MAX_ACCEPT_BACKOFF)
                    };
                    warn!("Accept error: {}; retrying in {:?}", e, backoff);
                    tokio::select! {
                        _ = shutdown.cancelled() => return Err(ServerError::ServerClosed),
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
                Err(e) => {
                    error!("Accept failed: {}", e);
                    return Err(ServerError::Accept(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_temporary() {
        for kind in [
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::Interrupted,
            io::ErrorKind::TimedOut,
        ] {
            assert!(is_temporary(&io::Error::from(kind)));
        }
        assert!(!is_temporary(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(!is_temporary(&io::Error::from(io::ErrorKind::InvalidInput)));
    }
}
