use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// An authenticated account, produced by an [`Authenticator`].
///
/// The session keeps it for its whole lifetime once PASS succeeds.
#[derive(Debug, Clone)]
pub struct FtpUser {
    pub username: String,
    /// Opaque credential as stored by the backend; never checked again.
    pub password: String,
    /// Absolute real path the virtual `/` maps onto.
    pub home_dir: PathBuf,
    pub current_dir: String,
}

impl FtpUser {
    pub fn new(username: &str, password: &str, home_dir: PathBuf) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            home_dir,
            current_dir: String::from("/"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid password for user: {0}")]
    InvalidPassword(String),

    #[error("Failed to read passwd file {path}: {source}")]
    PasswdRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Authentication backend failure: {0}")]
    Backend(String),
}

/// Credential check used by PASS.
///
/// Any `Err` is reported to the client as a plain authentication failure.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<FtpUser, AuthError>;
}
