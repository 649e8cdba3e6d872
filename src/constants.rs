// src/constants.rs

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9_.-]{1,32}$";

/// Session attribute holding the name sent with USER until PASS arrives.
pub const ATTRIBUTE_USER_ARGUMENT: &str = "user-argument";
/// Session attribute holding the negotiated TYPE.
pub const ATTRIBUTE_DATA_TYPE: &str = "data-type";
/// Session attribute holding the virtual source path between RNFR and RNTO.
pub const ATTRIBUTE_RENAME_FROM: &str = "rename-from";

pub const DATA_TYPE_ASCII: &str = "ASCII";
pub const DATA_TYPE_BINARY: &str = "Binary";

pub const DEFAULT_NAME: &str = "ferroftpd";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to ferroftpd";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ferroftpd.toml";

/// Longest control line accepted, terminator included.
pub const MAX_COMMAND_LINE_LENGTH: usize = 4096;

pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024;
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024;

/// Separator used to build OPTS/SITE sub-command keys, e.g. `SITE_WHO`.
pub const SUBCOMMAND_SEPARATOR: &str = "_";
