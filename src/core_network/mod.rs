pub mod datachannel;
pub mod error;
pub mod network;
pub mod pasv;
pub mod port;

pub use datachannel::DataChannel;
pub use error::{DataChannelError, ServerError};
