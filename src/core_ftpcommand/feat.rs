use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::reply;
use crate::session::Session;
use async_trait::async_trait;

/// Extensions announced by FEAT, one per line.
pub const FEATURES: [&str; 6] = ["EPSV", "MDTM", "MFMT", "PASV", "SIZE", "UTF8"];

pub fn feature_list() -> String {
    let mut message = String::from("Extensions supported:");
    for feature in FEATURES {
        message.push_str("\n ");
        message.push_str(feature);
    }
    message.push_str("\nEnd");
    message
}

/// FEAT, usable before login.
pub struct Feat;

#[async_trait]
impl CommandHandler for Feat {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        session.reply(reply::SYSTEM_STATUS, &feature_list()).await
    }
}
