use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::site::helper::respond_with_lines;
use crate::session::Session;
use async_trait::async_trait;
use chrono::Local;

/// SITE WHO: the current connection. Sessions are not tracked server-wide,
/// so no other connection is listed.
pub struct SiteWho;

#[async_trait]
impl CommandHandler for SiteWho {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        let username = session
            .user()
            .map(|user| user.username.clone())
            .unwrap_or_else(|| "anonymous".to_string());
        let now = Local::now();
        let online = now.signed_duration_since(session.connect_at());
        let idle = now.signed_duration_since(session.last_access_at());

        let lines = [
            format!(
                "{:<16} {:<22} {:<10} {:<8} {}",
                "User", "Address", "Online", "Idle", "Directory"
            ),
            format!(
                "{:<16} {:<22} {:<10} {:<8} {}",
                username,
                session.remote_addr().to_string(),
                format!("{}s", online.num_seconds()),
                format!("{}s", idle.num_seconds()),
                session.current_dir()
            ),
        ];
        respond_with_lines(session, lines).await
    }
}
