use anyhow::{Context, Result};
use clap::Parser;
use ferroftpd::config::Config;
use ferroftpd::core_auth::hash_password;
use ferroftpd::core_cli::Cli;
use ferroftpd::core_log::init_logger;
use ferroftpd::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    if let Some(password) = args.hash_password.as_deref() {
        let hashed = hash_password(password).context("Failed to hash password")?;
        println!("{}", hashed);
        return Ok(());
    }

    init_logger(args.verbose);

    // Load configuration from the TOML file
    let mut config = Config::load_from_file(&args.config)?;

    // Override the control port from CLI if provided
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }

    // Run the FTP server
    server::run(config).await
}
