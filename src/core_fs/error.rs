use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Not a plain file: {0}")]
    NotAFile(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("No authenticated user for path resolution")]
    NoUser,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    pub fn to_ftp_response(&self) -> (u16, String) {
        use crate::core_ftpcommand::reply;
        match self {
            FsError::NotFound(_) => (
                reply::REQUESTED_ACTION_NOT_TAKEN,
                "No such file or directory.".to_string(),
            ),
            FsError::NotAFile(_) => (
                reply::REQUESTED_ACTION_NOT_TAKEN,
                "Not a plain file.".to_string(),
            ),
            FsError::NotADirectory(_) => (
                reply::REQUESTED_ACTION_NOT_TAKEN,
                "No such directory.".to_string(),
            ),
            FsError::NoUser => (reply::NOT_LOGGED_IN, "Not logged in.".to_string()),
            FsError::Io { .. } => (
                reply::REQUESTED_ACTION_ABORTED,
                "Requested action aborted. Local error in processing.".to_string(),
            ),
        }
    }
}
