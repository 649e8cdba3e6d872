#![allow(dead_code)]

use async_trait::async_trait;
use ferroftpd::{AuthError, Authenticator, Config, FtpServer, FtpUser, ServerError};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "correct";

/// Accepts a single fixed account rooted at `home`.
pub struct StaticAuthenticator {
    home: PathBuf,
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<FtpUser, AuthError> {
        if username != USERNAME {
            return Err(AuthError::UnknownUser(username.to_string()));
        }
        if password != PASSWORD {
            return Err(AuthError::InvalidPassword(username.to_string()));
        }
        Ok(FtpUser::new(username, password, self.home.clone()))
    }
}

pub struct TestServer {
    pub server: FtpServer,
    pub addr: SocketAddr,
    pub handle: JoinHandle<Result<(), ServerError>>,
}

pub fn test_config(home: &Path) -> Config {
    let mut config = Config::default();
    config.server.name = String::from("testftpd");
    config.server.listen_address = String::from("127.0.0.1");
    config.server.listen_port = 0;
    config.server.chroot_dir = home.display().to_string();
    config
}

pub fn server_with_config(config: Config, home: &Path) -> FtpServer {
    FtpServer::new(
        config,
        Arc::new(StaticAuthenticator {
            home: home.to_path_buf(),
        }),
    )
}

pub fn test_server(home: &Path) -> FtpServer {
    server_with_config(test_config(home), home)
}

/// Serves `server` on an ephemeral localhost port.
pub async fn spawn(server: FtpServer) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn({
        let server = server.clone();
        async move { server.serve(listener).await }
    });
    TestServer {
        server,
        addr,
        handle,
    }
}

pub async fn start(home: &Path) -> TestServer {
    spawn(test_server(home)).await
}

/// Minimal control connection client.
pub struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    /// Connects and consumes the 220 greeting.
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        };
        let (code, _) = client.read_reply().await;
        assert_eq!(code, 220);
        client
    }

    pub async fn login(addr: SocketAddr) -> Self {
        let mut client = Self::connect(addr).await;
        assert_eq!(client.code(&format!("USER {}", USERNAME)).await, 331);
        assert_eq!(client.code(&format!("PASS {}", PASSWORD)).await, 230);
        client
    }

    /// Reads one reply. Embedded `\n` belong to the text; a reply ends with
    /// `\r\n`.
    pub async fn read_reply(&mut self) -> (u16, String) {
        let mut raw = Vec::new();
        loop {
            let n = tokio::time::timeout(
                Duration::from_secs(5),
                self.reader.read_until(b'\n', &mut raw),
            )
            .await
            .expect("reply timed out")
            .unwrap();
            assert!(n > 0, "connection closed while waiting for a reply");
            if raw.ends_with(b"\r\n") {
                break;
            }
        }
        let text = String::from_utf8(raw).unwrap();
        let code = text[..3].parse().unwrap();
        (code, text[4..].trim_end_matches("\r\n").to_string())
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    /// Writes `bytes` as is, without adding a line terminator.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.unwrap();
    }

    /// Half-closes the control connection from the client side.
    pub async fn shutdown_write(&mut self) {
        self.writer.shutdown().await.unwrap();
    }

    pub async fn cmd(&mut self, line: &str) -> (u16, String) {
        self.send(line).await;
        self.read_reply().await
    }

    pub async fn code(&mut self, line: &str) -> u16 {
        self.cmd(line).await.0
    }

    /// True once the server closed the control connection.
    pub async fn is_closed(&mut self) -> bool {
        let mut buf = Vec::new();
        matches!(
            tokio::time::timeout(
                Duration::from_secs(5),
                self.reader.read_until(b'\n', &mut buf)
            )
            .await,
            Ok(Ok(0))
        )
    }

    /// Sends PASV and returns the announced data address.
    pub async fn pasv(&mut self) -> SocketAddr {
        let (code, text) = self.cmd("PASV").await;
        assert_eq!(code, 227, "{}", text);
        parse_pasv(&text)
    }
}

pub fn parse_pasv(text: &str) -> SocketAddr {
    let start = text.find('(').unwrap() + 1;
    let end = text.find(')').unwrap();
    let fields: Vec<u16> = text[start..end]
        .split(',')
        .map(|f| f.parse().unwrap())
        .collect();
    assert_eq!(fields.len(), 6);
    format!(
        "{}.{}.{}.{}:{}",
        fields[0],
        fields[1],
        fields[2],
        fields[3],
        fields[4] * 256 + fields[5]
    )
    .parse()
    .unwrap()
}
