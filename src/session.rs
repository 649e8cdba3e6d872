use crate::config::ServerConfig;
use crate::constants::MAX_COMMAND_LINE_LENGTH;
use crate::core_auth::FtpUser;
use crate::core_events::SessionInfo;
use crate::core_fs::{path, FsError, ResolvedPath};
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::is_without_authentication_command;
use crate::core_ftpcommand::reply::{self, format_reply};
use crate::core_network::error::DataChannelError;
use crate::core_network::DataChannel;
use crate::server::ServerContext;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs::Metadata;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Download,
    Upload,
}

/// One control connection.
///
/// Owned by a single task: commands are read, dispatched and answered
/// strictly one after another, so none of the fields need locking.
pub struct Session {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    data_channel: Option<DataChannel>,

    user: Option<FtpUser>,
    is_logged_in: bool,
    current_dir: String,

    connect_at: DateTime<Local>,
    last_access_at: DateTime<Local>,
    attributes: Option<HashMap<String, String>>,

    remote_addr: SocketAddr,
    local_addr: SocketAddr,
    context: Arc<ServerContext>,

    closed: bool,
    last_reply: u16,

    bytes_sent: u64,
    bytes_received: u64,
    files_sent: u32,
    files_received: u32,
}

impl Session {
    pub fn new(socket: TcpStream, context: Arc<ServerContext>) -> io::Result<Self> {
        let remote_addr = socket.peer_addr()?;
        let local_addr = socket.local_addr()?;
        let (read_half, write_half) = socket.into_split();
        let now = Local::now();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            data_channel: None,
            user: None,
            is_logged_in: false,
            current_dir: String::from("/"),
            connect_at: now,
            last_access_at: now,
            attributes: None,
            remote_addr,
            local_addr,
            context,
            closed: false,
            last_reply: 0,
            bytes_sent: 0,
            bytes_received: 0,
            files_sent: 0,
            files_received: 0,
        })
    }

    /// Runs the session until the peer disconnects or a command closes it.
    pub async fn handle(mut self) {
        info!("[{}] Connection opened", self.remote_addr);

        let welcome = self.context.config.server.welcome_message.clone();
        if let Err(e) = self.reply(reply::SERVICE_READY, &welcome).await {
            warn!("[{}] Failed to send greeting: {}", self.remote_addr, e);
            self.finish().await;
            return;
        }

        let context = Arc::clone(&self.context);
        context.listeners.on_connect(&self.snapshot()).await;

        let mut line = Vec::new();
        while !self.is_closed() {
            line.clear();
            let read = (&mut self.reader)
                .take(MAX_COMMAND_LINE_LENGTH as u64)
                .read_until(b'\n', &mut line)
                .await;
            match read {
                Ok(0) => break,
                Ok(_) if line.ends_with(b"\n") => {}
                Ok(n) if n >= MAX_COMMAND_LINE_LENGTH => {
                    warn!(
                        "[{}] Command line over {} bytes",
                        self.remote_addr, MAX_COMMAND_LINE_LENGTH
                    );
                    if self
                        .reply(reply::SYNTAX_ERROR, "Command line too long.")
                        .await
                        .is_err()
                    {
                        break;
                    }
                    match self.discard_line().await {
                        Ok(true) => continue,
                        Ok(false) => break,
                        Err(e) => {
                            debug!("[{}] Control read failed: {}", self.remote_addr, e);
                            break;
                        }
                    }
                }
                Ok(_) => {
                    debug!("[{}] Unterminated line before EOF", self.remote_addr);
                    break;
                }
                Err(e) => {
                    debug!("[{}] Control read failed: {}", self.remote_addr, e);
                    break;
                }
            }

            let request = FtpRequest::parse(&String::from_utf8_lossy(&line));
            if let Err(e) = self.interpreter(&request).await {
                warn!("[{}] Control write failed: {}", self.remote_addr, e);
                break;
            }
        }

        self.finish().await;
    }

    /// Handles one request: authorization gate, lookup, hooks and handler.
    async fn interpreter(&mut self, request: &FtpRequest) -> io::Result<()> {
        self.last_access_at = Local::now();
        info!("[{}] >>> {}", self.remote_addr, request.loggable());

        if !self.is_logged_in && !is_without_authentication_command(&request.command) {
            return self.reply(reply::NOT_LOGGED_IN, "Not logged in.").await;
        }

        let context = Arc::clone(&self.context);
        let Some(handler) = context.commands.get(&request.command) else {
            return self
                .reply(reply::COMMAND_NOT_IMPLEMENTED, "Command not implemented.")
                .await;
        };

        context
            .listeners
            .before_command(&self.snapshot(), request)
            .await;

        self.last_reply = 0;
        let result = handler.execute(self, request).await;

        context
            .listeners
            .after_command(&self.snapshot(), request, self.last_reply)
            .await;

        result
    }

    /// Skips the rest of an oversized line without buffering it. Returns
    /// `false` on end of stream.
    async fn discard_line(&mut self) -> io::Result<bool> {
        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Ok(false);
            }
            match buf.iter().position(|&b| b == b'\n') {
                Some(idx) => {
                    self.reader.consume(idx + 1);
                    return Ok(true);
                }
                None => {
                    let len = buf.len();
                    self.reader.consume(len);
                }
            }
        }
    }

    async fn finish(&mut self) {
        self.close_data_channel().await;
        if let Err(e) = self.writer.shutdown().await {
            debug!("[{}] Control shutdown: {}", self.remote_addr, e);
        }
        self.closed = true;

        let context = Arc::clone(&self.context);
        context.listeners.on_disconnect(&self.snapshot()).await;
        info!("[{}] Connection closed", self.remote_addr);
    }

    /// Writes one reply line and flushes it.
    pub async fn reply(&mut self, code: u16, message: &str) -> io::Result<()> {
        debug!("[{}] <<< {} {}", self.remote_addr, code, message);
        self.writer
            .write_all(format_reply(code, message).as_bytes())
            .await?;
        self.writer.flush().await?;
        self.last_reply = code;
        Ok(())
    }

    pub async fn reply_fs_error(&mut self, err: &FsError) -> io::Result<()> {
        debug!("[{}] {}", self.remote_addr, err);
        let (code, message) = err.to_ftp_response();
        self.reply(code, &message).await
    }

    /// Ends the session once the current command returns.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn snapshot(&self) -> SessionInfo {
        SessionInfo {
            remote_addr: self.remote_addr,
            local_addr: self.local_addr,
            username: self.user.as_ref().map(|u| u.username.clone()),
            is_logged_in: self.is_logged_in,
            current_dir: self.current_dir.clone(),
            connect_at: self.connect_at,
            last_access_at: self.last_access_at,
        }
    }

    // Login state

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn user(&self) -> Option<&FtpUser> {
        self.user.as_ref()
    }

    /// Marks the session authenticated. There is no way back.
    pub fn login(&mut self, user: FtpUser) {
        self.current_dir = clean_or_root(&user.current_dir);
        self.user = Some(user);
        self.is_logged_in = true;
    }

    // Attributes

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|attributes| attributes.get(key))
            .map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.as_mut().and_then(|attributes| attributes.remove(key))
    }

    // Accessors

    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    pub fn set_current_dir(&mut self, virtual_path: String) {
        self.current_dir = virtual_path;
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn connect_at(&self) -> DateTime<Local> {
        self.connect_at
    }

    pub fn last_access_at(&self) -> DateTime<Local> {
        self.last_access_at
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.context
    }

    pub fn config(&self) -> &ServerConfig {
        &self.context.config.server
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub fn files_sent(&self) -> u32 {
        self.files_sent
    }

    pub fn files_received(&self) -> u32 {
        self.files_received
    }

    // Paths

    /// Resolves a client path against the current directory and home.
    pub fn resolve_path(&self, arg: &str) -> Result<ResolvedPath, FsError> {
        let user = self.user.as_ref().ok_or(FsError::NoUser)?;
        Ok(path::resolve(&user.home_dir, &self.current_dir, arg))
    }

    /// Resolves `arg` and stats it. Missing and inaccessible paths both
    /// report `NotFound`.
    pub async fn build_path(&self, arg: &str) -> Result<(ResolvedPath, Metadata), FsError> {
        let resolved = self.resolve_path(arg)?;
        match tokio::fs::metadata(&resolved.real).await {
            Ok(metadata) => Ok((resolved, metadata)),
            Err(e) => {
                debug!("[{}] stat {:?}: {}", self.remote_addr, resolved.real, e);
                Err(FsError::NotFound(resolved.virtual_path))
            }
        }
    }

    // Data channel

    pub fn has_data_channel(&self) -> bool {
        self.data_channel.is_some()
    }

    /// Installs `channel`, closing the previous one first.
    pub async fn set_data_channel(&mut self, channel: DataChannel) {
        self.close_data_channel().await;
        self.data_channel = Some(channel);
    }

    pub async fn close_data_channel(&mut self) {
        if let Some(mut channel) = self.data_channel.take() {
            channel.close().await;
            debug!("[{}] Data channel closed", self.remote_addr);
        }
    }

    /// Replies 503 and returns `false` when no data channel was negotiated.
    pub async fn require_data_channel(&mut self) -> io::Result<bool> {
        if self.data_channel.is_some() {
            return Ok(true);
        }
        self.reply(
            reply::BAD_SEQUENCE_OF_COMMANDS,
            "PORT or PASV must be issued first.",
        )
        .await?;
        Ok(false)
    }

    /// Sends an in-memory payload, closes the channel and replies 226.
    pub async fn write_data(&mut self, data: &[u8]) -> io::Result<()> {
        let Some(mut channel) = self.take_data_channel().await? else {
            return Ok(());
        };
        let result = channel.write(data).await;
        channel.close().await;
        self.finish_transfer(result, Direction::Download).await
    }

    /// Streams `source` to the client, closes the channel and replies 226.
    pub async fn write_from_stream<R>(&mut self, source: &mut R) -> io::Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let Some(mut channel) = self.take_data_channel().await? else {
            return Ok(());
        };
        let buffer_size = self.config().download_buffer_size();
        let result = channel.write_from(source, buffer_size).await;
        channel.close().await;
        self.finish_transfer(result, Direction::Download).await
    }

    /// Receives the client's upload into `sink`, closes the channel and
    /// replies 226.
    pub async fn read_to_stream<W>(&mut self, sink: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let Some(mut channel) = self.take_data_channel().await? else {
            return Ok(());
        };
        let buffer_size = self.config().upload_buffer_size();
        let result = channel.read_into(sink, buffer_size).await;
        channel.close().await;
        self.finish_transfer(result, Direction::Upload).await
    }

    async fn take_data_channel(&mut self) -> io::Result<Option<DataChannel>> {
        if !self.require_data_channel().await? {
            return Ok(None);
        }
        Ok(self.data_channel.take())
    }

    async fn finish_transfer(
        &mut self,
        result: Result<u64, DataChannelError>,
        direction: Direction,
    ) -> io::Result<()> {
        match result {
            Ok(bytes) => {
                let verb = match direction {
                    Direction::Download => {
                        self.bytes_sent += bytes;
                        self.files_sent += 1;
                        "sent"
                    }
                    Direction::Upload => {
                        self.bytes_received += bytes;
                        self.files_received += 1;
                        "received"
                    }
                };
                info!("[{}] Transfer complete, {} {} bytes", self.remote_addr, verb, bytes);
                self.reply(
                    reply::CLOSING_DATA_CONNECTION,
                    &format!("Closing data connection, {} {} bytes", verb, bytes),
                )
                .await
            }
            Err(e) => {
                warn!("[{}] Transfer failed: {}", self.remote_addr, e);
                self.reply(
                    reply::TRANSFER_ABORTED,
                    "Connection closed; transfer aborted.",
                )
                .await
            }
        }
    }
}

fn clean_or_root(dir: &str) -> String {
    if dir.is_empty() {
        String::from("/")
    } else {
        path::clean_virtual_path(dir)
    }
}
