use crate::config::Config;
use crate::core_auth::{Authenticator, PasswdAuthenticator};
use crate::core_events::{FtpListener, ListenerRegistry, ServerInfo};
use crate::core_ftpcommand::handlers::{initialize_command_handlers, CommandRegistry};
use crate::core_network::error::ServerError;
use crate::core_network::network;
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// State shared by the accept loop and every session of one server.
pub struct ServerContext {
    pub config: Arc<Config>,
    pub authenticator: Arc<dyn Authenticator>,
    pub commands: CommandRegistry,
    pub listeners: ListenerRegistry,
}

/// A configured FTP server. Clones share the same context and shutdown
/// signal, so a clone can stop a server that is serving elsewhere.
#[derive(Clone)]
pub struct FtpServer {
    context: Arc<ServerContext>,
    shutdown: CancellationToken,
}

impl FtpServer {
    pub fn new(config: Config, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            context: Arc::new(ServerContext {
                config: Arc::new(config),
                authenticator,
                commands: initialize_command_handlers(),
                listeners: ListenerRegistry::new(),
            }),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.context
    }

    pub async fn add_listener(&self, name: &str, listener: Arc<dyn FtpListener>) {
        self.context.listeners.add(name, listener).await;
    }

    pub async fn remove_listener(&self, name: &str) -> bool {
        self.context.listeners.remove(name).await
    }

    /// Binds the configured control address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.context.config.server.listen_socket()?;
        TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
    }

    /// Serves an already bound listener until shutdown or a fatal accept
    /// error. `on_start` and `on_stop` bracket the accept loop.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind {
                addr: String::from("listener"),
                source,
            })?;
        let server_info = self.server_info(local_addr);

        info!("{} listening on {}", server_info.name, local_addr);
        self.context.listeners.on_start(&server_info).await;

        let result = network::accept_loop(
            listener,
            Arc::clone(&self.context),
            self.shutdown.clone(),
        )
        .await;

        self.context.listeners.on_stop(&server_info).await;
        info!("{} stopped", server_info.name);
        result
    }

    pub async fn listen_and_serve(&self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Stops accepting. Running sessions finish on their own.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn server_info(&self, local_addr: SocketAddr) -> ServerInfo {
        ServerInfo {
            name: self.context.config.server.name.clone(),
            local_addr,
        }
    }
}

/// Runs the FTP server with the provided configuration.
///
/// Loads the passwd backend, serves until Ctrl-C and treats the resulting
/// shutdown as success.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config);

    let authenticator = PasswdAuthenticator::load(
        &config.server.passwd_file,
        &config.server.chroot_path(),
    )
    .with_context(|| format!("Failed to load passwd file: {}", config.server.passwd_file))?;
    if authenticator.is_empty() {
        warn!("No account loaded, every login will fail");
    }

    let server = FtpServer::new(config, Arc::new(authenticator));

    let stopper = server.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, shutting down");
                stopper.shutdown();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    match server.listen_and_serve().await {
        Ok(()) | Err(ServerError::ServerClosed) => Ok(()),
        Err(e) => {
            error!("Server error: {}", e);
            Err(e.into())
        }
    }
}
