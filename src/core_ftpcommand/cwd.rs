use crate::core_fs::FsError;
use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;
use log::info;

/// Moves the session to `arg` if it names an existing directory.
///
/// Shared by CWD and CDUP. Missing paths and plain files are both answered
/// with "No such directory.".
pub(crate) async fn change_dir(session: &mut Session, arg: &str) -> std::io::Result<()> {
    let resolved = match session.build_path(arg).await {
        Ok((resolved, metadata)) if metadata.is_dir() => resolved,
        Ok((resolved, _)) => {
            return session
                .reply_fs_error(&FsError::NotADirectory(resolved.virtual_path))
                .await;
        }
        Err(FsError::NotFound(path)) => {
            return session.reply_fs_error(&FsError::NotADirectory(path)).await;
        }
        Err(e) => return session.reply_fs_error(&e).await,
    };

    info!(
        "[{}] Changed directory to {}",
        session.remote_addr(),
        resolved.virtual_path
    );
    let message = format!("\"{}\" is current directory.", resolved.virtual_path);
    session.set_current_dir(resolved.virtual_path);
    session
        .reply(reply::REQUESTED_FILE_ACTION_OKAY, &message)
        .await
}

/// Handles the CWD (Change Working Directory) FTP command.
pub struct Cwd;

#[async_trait]
impl CommandHandler for Cwd {
    async fn execute(&self, session: &mut Session, request: &FtpRequest) -> std::io::Result<()> {
        change_dir(session, &request.argument).await
    }
}
