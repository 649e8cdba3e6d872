//! Control channel reply codes (RFC 959 and extensions).

pub const FILE_STATUS_OKAY: u16 = 150;

pub const COMMAND_OKAY: u16 = 200;
/// Superfluous at this site.
pub const COMMAND_SUPERFLUOUS: u16 = 202;
pub const SYSTEM_STATUS: u16 = 211;
pub const FILE_STATUS: u16 = 213;
pub const HELP_MESSAGE: u16 = 214;
pub const NAME_SYSTEM_TYPE: u16 = 215;
pub const SERVICE_READY: u16 = 220;
pub const CLOSING_CONTROL_CONNECTION: u16 = 221;
pub const CLOSING_DATA_CONNECTION: u16 = 226;
pub const ENTERING_PASSIVE_MODE: u16 = 227;
pub const ENTERING_EXTENDED_PASSIVE_MODE: u16 = 229;
pub const USER_LOGGED_IN: u16 = 230;
pub const REQUESTED_FILE_ACTION_OKAY: u16 = 250;
pub const PATHNAME_CREATED: u16 = 257;

pub const USER_NAME_OKAY_NEED_PASSWORD: u16 = 331;
pub const FILE_ACTION_PENDING: u16 = 350;

pub const CANT_OPEN_DATA_CONNECTION: u16 = 425;
pub const TRANSFER_ABORTED: u16 = 426;
pub const REQUESTED_ACTION_ABORTED: u16 = 451;

pub const SYNTAX_ERROR: u16 = 500;
pub const SYNTAX_ERROR_IN_ARGUMENTS: u16 = 501;
pub const COMMAND_NOT_IMPLEMENTED: u16 = 502;
pub const BAD_SEQUENCE_OF_COMMANDS: u16 = 503;
pub const NOT_IMPLEMENTED_FOR_PARAMETER: u16 = 504;
pub const NETWORK_PROTOCOL_NOT_SUPPORTED: u16 = 522;
pub const NOT_LOGGED_IN: u16 = 530;
pub const REQUEST_DENIED: u16 = 534;
pub const REQUESTED_ACTION_NOT_TAKEN: u16 = 550;
pub const FILE_NAME_NOT_ALLOWED: u16 = 553;

/// Formats one reply line: `<code> <text>\r\n`.
///
/// Multi-line informational text stays inside the single text field.
pub fn format_reply(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}
