use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::{CommandHandler, SubNamespace};
use crate::core_ftpcommand::site::helper::respond_with_lines;
use crate::session::Session;
use async_trait::async_trait;

fn describe(subcommand: &str) -> &'static str {
    match subcommand {
        "DESCUSER" => "display user information.",
        "HELP" => "display this message.",
        "STAT" => "show statistics.",
        "WHO" => "display the current connection.",
        "ZONE" => "display timezone.",
        _ => "",
    }
}

/// SITE HELP, generated from the SITE sub-table.
pub struct SiteHelp;

#[async_trait]
impl CommandHandler for SiteHelp {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        let lines: Vec<String> = session
            .context()
            .commands
            .sub_commands(SubNamespace::Site)
            .into_iter()
            .map(|sub| format!("{:<8} : {}", sub, describe(sub)))
            .collect();
        respond_with_lines(session, lines).await
    }
}
