use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::site::helper::respond_with_lines;
use crate::session::Session;
use async_trait::async_trait;
use chrono::{Local, Utc};

/// SITE ZONE: server local time and its offset from UTC.
pub struct SiteZone;

#[async_trait]
impl CommandHandler for SiteZone {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        let now = Local::now();
        let lines = [
            format!("local time : {}", now.format("%Y-%m-%d %H:%M:%S %:z")),
            format!("utc time   : {}", now.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S")),
            format!("utc offset : {}", now.format("%:z")),
        ];
        respond_with_lines(session, lines).await
    }
}
