use crate::core_ftpcommand::ftpcommand::FtpRequest;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::site::helper::respond_with_lines;
use crate::session::Session;
use async_trait::async_trait;

/// SITE DESCUSER: describes the logged-in account. The password is masked.
pub struct SiteDescuser;

#[async_trait]
impl CommandHandler for SiteDescuser {
    async fn execute(&self, session: &mut Session, _request: &FtpRequest) -> std::io::Result<()> {
        let (username, home_dir) = match session.user() {
            Some(user) => (user.username.clone(), user.home_dir.display().to_string()),
            None => (String::from("-"), String::from("-")),
        };
        respond_with_lines(
            session,
            [
                format!("username : {}", username),
                String::from("password : ******"),
                format!("home dir : {}", home_dir),
            ],
        )
        .await
    }
}
