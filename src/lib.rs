pub mod config;
pub mod constants;
pub mod core_auth;
pub mod core_cli;
pub mod core_events;
pub mod core_fs;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod server;
pub mod session;

pub use config::{Config, ServerConfig};
pub use core_auth::{AuthError, Authenticator, FtpUser};
pub use core_events::{FtpListener, ServerInfo, SessionInfo};
pub use core_ftpcommand::ftpcommand::FtpRequest;
pub use core_network::error::ServerError;
pub use server::{FtpServer, ServerContext};
