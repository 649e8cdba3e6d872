use crate::constants::{
    DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_NAME, DEFAULT_UPLOAD_BUFFER_SIZE,
    DEFAULT_WELCOME_MESSAGE,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),

    #[error("Invalid PASV address (IPv4 expected): {0}")]
    InvalidPasvAddress(String),

    #[error("Invalid passive port range: {0}-{1}")]
    InvalidPortRange(u16, u16),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub listen_address: String,
    pub listen_port: u16,
    pub welcome_message: String,
    pub pasv_address: Option<String>, // Public IP advertised in PASV replies
    pub pasv_port_min: Option<u16>,
    pub pasv_port_max: Option<u16>,
    pub chroot_dir: String,
    pub passwd_file: String,
    pub upload_buffer_size: Option<usize>, // Optional to allow default value
    pub download_buffer_size: Option<usize>, // Optional to allow default value
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_NAME),
            listen_address: String::from("0.0.0.0"),
            listen_port: 2121,
            welcome_message: String::from(DEFAULT_WELCOME_MESSAGE),
            pasv_address: None,
            pasv_port_min: None,
            pasv_port_max: None,
            chroot_dir: String::from("/var/ftp"),
            passwd_file: String::from("/etc/ferroftpd.passwd"),
            upload_buffer_size: Some(DEFAULT_UPLOAD_BUFFER_SIZE), // Default 256 KB
            download_buffer_size: Some(DEFAULT_DOWNLOAD_BUFFER_SIZE), // Default 128 KB
        }
    }
}

impl ServerConfig {
    pub fn listen_socket(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .listen_address
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddress(self.listen_address.clone()))?;
        Ok(SocketAddr::new(ip, self.listen_port))
    }

    /// The address advertised in PASV replies, if one is configured.
    pub fn pasv_ip(&self) -> Result<Option<Ipv4Addr>, ConfigError> {
        match &self.pasv_address {
            None => Ok(None),
            Some(addr) => addr
                .parse::<Ipv4Addr>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidPasvAddress(addr.clone())),
        }
    }

    /// Passive port range; `None` means an ephemeral port is used.
    pub fn passive_ports(&self) -> Option<RangeInclusive<u16>> {
        match (self.pasv_port_min, self.pasv_port_max) {
            (Some(min), Some(max)) => Some(min..=max),
            (Some(min), None) => Some(min..=u16::MAX),
            (None, Some(max)) => Some(1024..=max),
            (None, None) => None,
        }
    }

    pub fn upload_buffer_size(&self) -> usize {
        self.upload_buffer_size.unwrap_or(DEFAULT_UPLOAD_BUFFER_SIZE)
    }

    pub fn download_buffer_size(&self) -> usize {
        self.download_buffer_size
            .unwrap_or(DEFAULT_DOWNLOAD_BUFFER_SIZE)
    }

    pub fn chroot_path(&self) -> PathBuf {
        PathBuf::from(&self.chroot_dir)
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;
        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.listen_socket()?;
        self.server.pasv_ip()?;
        if let Some(range) = self.server.passive_ports() {
            if range.start() > range.end() {
                return Err(ConfigError::InvalidPortRange(*range.start(), *range.end()));
            }
        }
        Ok(())
    }
}
