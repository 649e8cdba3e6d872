pub mod listener;

pub use listener::{FtpListener, ListenerRegistry, ServerInfo, SessionInfo};
