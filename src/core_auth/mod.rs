pub mod core_auth;
pub mod helper;

pub use core_auth::{AuthError, Authenticator, FtpUser};
pub use helper::{hash_password, verify_password, PasswdAuthenticator};
