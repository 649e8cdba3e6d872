//! The per-transfer data connection.
//!
//! Both variants expose the same read/write/close operations. The passive
//! variant keeps its state behind a mutex because the accept of the inbound
//! connection can race with an abort coming from the control connection.

use crate::core_network::error::DataChannelError;
use log::{debug, warn};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::ops::RangeInclusive;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// Unwraps IPv4-mapped IPv6 addresses so peers compare equal across stacks.
pub fn normalize_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

pub enum DataChannel {
    Active(ActiveChannel),
    Passive(PassiveChannel),
}

/// Server dialled out to the address given with PORT.
pub struct ActiveChannel {
    stream: Option<TcpStream>,
    remote_addr: SocketAddr,
}

/// Server listens and accepts exactly one connection from the control peer.
pub struct PassiveChannel {
    state: Mutex<PassiveState>,
    local_addr: SocketAddr,
}

enum PassiveState {
    Listening {
        listener: TcpListener,
        expected_peer: IpAddr,
    },
    Connected(TcpStream),
    Closed,
}

impl DataChannel {
    /// Active mode: dial `addr`.
    pub async fn connect(addr: SocketAddr) -> Result<Self, DataChannelError> {
        let stream = TcpStream::connect(addr).await?;
        debug!("Active data connection established with {}", addr);
        Ok(DataChannel::Active(ActiveChannel {
            stream: Some(stream),
            remote_addr: addr,
        }))
    }

    /// Passive mode: bind on `ip`, using the first free port of `ports` or an
    /// ephemeral one. The connection itself is accepted by the first I/O call.
    pub async fn listen(
        ip: IpAddr,
        ports: Option<RangeInclusive<u16>>,
        expected_peer: IpAddr,
    ) -> Result<Self, DataChannelError> {
        let listener = bind_passive(ip, ports).await?;
        let local_addr = listener.local_addr()?;
        debug!("Passive data listener bound on {}", local_addr);
        Ok(DataChannel::Passive(PassiveChannel {
            state: Mutex::new(PassiveState::Listening {
                listener,
                expected_peer: normalize_ip(expected_peer),
            }),
            local_addr,
        }))
    }

    pub fn is_passive(&self) -> bool {
        matches!(self, DataChannel::Passive(_))
    }

    /// Remote address for active mode, listening address for passive mode.
    pub fn negotiated_addr(&self) -> SocketAddr {
        match self {
            DataChannel::Active(active) => active.remote_addr,
            DataChannel::Passive(passive) => passive.local_addr,
        }
    }

    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, DataChannelError> {
        match self {
            DataChannel::Active(active) => Ok(active.stream()?.read(buf).await?),
            DataChannel::Passive(passive) => {
                let mut state = passive.state.lock().await;
                let stream = PassiveChannel::connected(&mut state).await?;
                Ok(stream.read(buf).await?)
            }
        }
    }

    /// Sends a complete payload and returns the number of bytes written.
    pub async fn write(&mut self, data: &[u8]) -> Result<u64, DataChannelError> {
        match self {
            DataChannel::Active(active) => Ok(write_all(active.stream()?, data).await?),
            DataChannel::Passive(passive) => {
                let mut state = passive.state.lock().await;
                let stream = PassiveChannel::connected(&mut state).await?;
                Ok(write_all(stream, data).await?)
            }
        }
    }

    /// Copies `reader` into the channel until it is exhausted.
    pub async fn write_from<R>(
        &mut self,
        reader: &mut R,
        buffer_size: usize,
    ) -> Result<u64, DataChannelError>
    where
        R: AsyncRead + Unpin + Send,
    {
        match self {
            DataChannel::Active(active) => {
                Ok(copy_with_buffer(reader, active.stream()?, buffer_size).await?)
            }
            DataChannel::Passive(passive) => {
                let mut state = passive.state.lock().await;
                let stream = PassiveChannel::connected(&mut state).await?;
                Ok(copy_with_buffer(reader, stream, buffer_size).await?)
            }
        }
    }

    /// Copies everything the peer sends into `writer` until end of stream.
    pub async fn read_into<W>(
        &mut self,
        writer: &mut W,
        buffer_size: usize,
    ) -> Result<u64, DataChannelError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        match self {
            DataChannel::Active(active) => {
                Ok(copy_with_buffer(active.stream()?, writer, buffer_size).await?)
            }
            DataChannel::Passive(passive) => {
                let mut state = passive.state.lock().await;
                let stream = PassiveChannel::connected(&mut state).await?;
                Ok(copy_with_buffer(stream, writer, buffer_size).await?)
            }
        }
    }

    /// Closes the connection (or the pending listener). Idempotent.
    pub async fn close(&mut self) {
        match self {
            DataChannel::Active(active) => {
                if let Some(mut stream) = active.stream.take() {
                    if let Err(e) = stream.shutdown().await {
                        debug!("Data connection shutdown with {}: {}", active.remote_addr, e);
                    }
                }
            }
            DataChannel::Passive(passive) => {
                let mut state = passive.state.lock().await;
                if let PassiveState::Connected(mut stream) =
                    std::mem::replace(&mut *state, PassiveState::Closed)
                {
                    if let Err(e) = stream.shutdown().await {
                        debug!("Data connection shutdown on {}: {}", passive.local_addr, e);
                    }
                }
            }
        }
    }
}

impl ActiveChannel {
    fn stream(&mut self) -> Result<&mut TcpStream, DataChannelError> {
        self.stream.as_mut().ok_or(DataChannelError::Closed)
    }
}

impl PassiveChannel {
    /// Accepts the pending connection if needed. Connections from any address
    /// other than the control peer are dropped.
    async fn connected(state: &mut PassiveState) -> Result<&mut TcpStream, DataChannelError> {
        if let PassiveState::Listening {
            listener,
            expected_peer,
        } = state
        {
            let expected = *expected_peer;
            let stream = loop {
                let (stream, peer) = listener.accept().await?;
                if normalize_ip(peer.ip()) == expected {
                    debug!("Passive data connection accepted from {}", peer);
                    break stream;
                }
                warn!(
                    "Rejected passive data connection from {} (expected {})",
                    peer, expected
                );
            };
            *state = PassiveState::Connected(stream);
        }

        match state {
            PassiveState::Connected(stream) => Ok(stream),
            _ => Err(DataChannelError::Closed),
        }
    }
}

async fn bind_passive(
    ip: IpAddr,
    ports: Option<RangeInclusive<u16>>,
) -> Result<TcpListener, DataChannelError> {
    let Some(range) = ports else {
        return Ok(TcpListener::bind((ip, 0)).await?);
    };

    for port in range {
        match TcpListener::bind((ip, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => debug!("Passive port {} unavailable: {}", port, e),
        }
    }
    Err(DataChannelError::NoPassivePort)
}

async fn write_all(stream: &mut TcpStream, data: &[u8]) -> io::Result<u64> {
    stream.write_all(data).await?;
    stream.flush().await?;
    Ok(data.len() as u64)
}

async fn copy_with_buffer<R, W>(reader: &mut R, writer: &mut W, buffer_size: usize) -> io::Result<u64>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buffer[..n]).await?;
        total += n as u64;
    }
    writer.flush().await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::time::Duration;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_normalize_ip() {
        let mapped = IpAddr::V6(Ipv4Addr::new(10, 1, 2, 3).to_ipv6_mapped());
        assert_eq!(normalize_ip(mapped), "10.1.2.3".parse::<IpAddr>().unwrap());
        assert_eq!(normalize_ip(LOCALHOST), LOCALHOST);
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        assert_eq!(normalize_ip(v6), v6);
    }

    #[tokio::test]
    async fn test_active_write_then_close() {
        let client = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let addr = client.local_addr().unwrap();

        let mut channel = DataChannel::connect(addr).await.unwrap();
        assert!(!channel.is_passive());
        assert_eq!(channel.negotiated_addr(), addr);

        let (mut peer, _) = client.accept().await.unwrap();
        assert_eq!(channel.write(b"hello").await.unwrap(), 5);
        channel.close().await;

        let mut received = Vec::new();
        peer.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"hello");

        assert!(matches!(
            channel.write(b"again").await,
            Err(DataChannelError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_active_connect_refused() {
        let probe = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let addr = probe.local_addr().unwrap();
        drop(probe);

        assert!(matches!(
            DataChannel::connect(addr).await,
            Err(DataChannelError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_passive_read_into() {
        let mut channel = DataChannel::listen(LOCALHOST, None, LOCALHOST).await.unwrap();
        assert!(channel.is_passive());
        let addr = channel.negotiated_addr();

        let uploader = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"upload body").await.unwrap();
            stream.shutdown().await.unwrap();
        });

        let mut sink: Vec<u8> = Vec::new();
        let n = channel.read_into(&mut sink, 4).await.unwrap();
        uploader.await.unwrap();

        assert_eq!(n, 11);
        assert_eq!(sink, b"upload body");
        channel.close().await;
    }

    #[tokio::test]
    async fn test_passive_read() {
        let mut channel = DataChannel::listen(LOCALHOST, None, LOCALHOST).await.unwrap();
        let addr = channel.negotiated_addr();

        let sender = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"abc").await.unwrap();
            stream.shutdown().await.unwrap();
        });

        let mut received = Vec::new();
        let mut buf = [0u8; 2];
        loop {
            let n = channel.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        sender.await.unwrap();
        assert_eq!(received, b"abc");

        channel.close().await;
        assert!(matches!(
            channel.read(&mut buf).await,
            Err(DataChannelError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_passive_write_from() {
        let mut channel = DataChannel::listen(LOCALHOST, None, LOCALHOST).await.unwrap();
        let addr = channel.negotiated_addr();

        let downloader = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        let mut source: &[u8] = b"file contents";
        assert_eq!(channel.write_from(&mut source, 3).await.unwrap(), 13);
        channel.close().await;

        assert_eq!(downloader.await.unwrap(), b"file contents");
    }

    #[tokio::test]
    async fn test_passive_drops_foreign_peer() {
        let stranger: IpAddr = "192.0.2.10".parse().unwrap();
        let mut channel = DataChannel::listen(LOCALHOST, None, stranger).await.unwrap();
        let addr = channel.negotiated_addr();

        let intruder = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await.unwrap_or(0)
        });

        let write = tokio::time::timeout(Duration::from_millis(300), channel.write(b"secret")).await;
        assert!(write.is_err(), "write must still be waiting for the real peer");
        assert_eq!(intruder.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_passive_port_range() {
        let taken = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = taken.local_addr().unwrap().port();

        assert!(matches!(
            DataChannel::listen(LOCALHOST, Some(port..=port), LOCALHOST).await,
            Err(DataChannelError::NoPassivePort)
        ));

        drop(taken);
        let channel = DataChannel::listen(LOCALHOST, Some(port..=port), LOCALHOST)
            .await
            .unwrap();
        assert_eq!(channel.negotiated_addr().port(), port);
    }

    #[tokio::test]
    async fn test_close_pending_passive() {
        let mut channel = DataChannel::listen(LOCALHOST, None, LOCALHOST).await.unwrap();
        channel.close().await;
        channel.close().await;
        assert!(matches!(
            channel.write(b"late").await,
            Err(DataChannelError::Closed)
        ));
    }
}
