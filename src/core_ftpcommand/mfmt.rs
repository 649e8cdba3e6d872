use crate::core_fs::FsError;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::mdtm::TIME_VAL_FORMAT;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use filetime::FileTime;
use log::{info, warn};

/// Splits `YYYYMMDDHHMMSS path` into Unix seconds, the raw stamp and the path.
fn parse_argument(argument: &str) -> Option<(i64, &str, &str)> {
    let (stamp, path) = argument.trim_start().split_once(char::is_whitespace)?;
    let path = path.trim_start();
    if path.is_empty() || stamp.len() != 14 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(stamp, TIME_VAL_FORMAT).ok()?;
    Some((Utc.from_utc_datetime(&naive).timestamp(), stamp, path))
}

/// MFMT: sets the modification time of a file (draft-somers-ftp-mfxx).
pub struct Mfmt;

#[async_trait]
impl CommandHandler for Mfmt {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        let Some((unix_seconds, stamp, path)) = parse_argument(&request.argument) else {
            return session
                .reply(
                    reply::SYNTAX_ERROR_IN_ARGUMENTS,
                    "Syntax error in parameters or arguments.",
                )
                .await;
        };

        let (resolved, metadata) = match session.build_path(path).await {
            Ok(found) => found,
            Err(e) => return session.reply_fs_error(&e).await,
        };
        if !metadata.is_file() {
            return session
                .reply_fs_error(&FsError::NotAFile(resolved.virtual_path))
                .await;
        }

        let real = resolved.real.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            filetime::set_file_mtime(&real, FileTime::from_unix_time(unix_seconds, 0))
        })
        .await
        .unwrap_or_else(|join_error| {
            Err(std::io::Error::new(std::io::ErrorKind::Other, join_error))
        });

        match outcome {
            Ok(()) => {
                info!("[{}] MFMT {} {}", session.remote_addr(), stamp, resolved.virtual_path);
                session
                    .reply(
                        reply::FILE_STATUS,
                        &format!("Modify={}; {}", stamp, resolved.virtual_path),
                    )
                    .await
            }
            Err(source) => {
                warn!("[{}] MFMT failed on {:?}: {}", session.remote_addr(), resolved.real, source);
                session
                    .reply_fs_error(&FsError::Io {
                        path: resolved.virtual_path,
                        source,
                    })
                    .await
            }
        }
    }
}
