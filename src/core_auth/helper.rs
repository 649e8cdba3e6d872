use crate::constants::USERNAME_REGEX;
use crate::core_auth::core_auth::{AuthError, Authenticator, FtpUser};
use async_trait::async_trait;
use bcrypt::{hash, verify, BcryptResult, DEFAULT_COST};
use log::{info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const DUMMY_PASSWORD: &str = "ferroftpd-unknown-user";

pub fn hash_password(password: &str) -> BcryptResult<String> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}

/// Cost factor of a `$2b$NN$...` hash.
fn hash_cost(hashed_password: &str) -> Option<u32> {
    hashed_password
        .split('$')
        .nth(2)?
        .parse()
        .ok()
        .filter(|cost| (4..=31).contains(cost))
}

async fn verify_blocking(password: &str, hashed_password: &str) -> Result<bool, AuthError> {
    let candidate = password.to_string();
    let hashed = hashed_password.to_string();
    tokio::task::spawn_blocking(move || verify_password(&candidate, &hashed))
        .await
        .map_err(|e| AuthError::Backend(e.to_string()))
}

/// One `username:bcrypt-hash:home-dir` line of the passwd file.
#[derive(Debug, Clone)]
pub struct PasswdEntry {
    username: String,
    hashed_password: String,
    home_dir: String,
}

impl PasswdEntry {
    pub fn from_line(line: &str) -> Option<Self> {
        // bcrypt hashes never contain ':' so a plain split is enough
        let parts: Vec<&str> = line.trim().split(':').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(PasswdEntry {
            username: parts[0].to_string(),
            hashed_password: parts[1].to_string(),
            home_dir: parts[2].to_string(),
        })
    }

    pub fn get_hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_home_dir(&self) -> &str {
        &self.home_dir
    }
}

/// Authenticates against a bcrypt passwd file loaded at startup.
#[derive(Debug, Clone)]
pub struct PasswdAuthenticator {
    entries: HashMap<String, PasswdEntry>,
    chroot_dir: PathBuf,
    /// Checked for unknown users so they cost as much as a wrong password.
    dummy_hash: String,
}

impl PasswdAuthenticator {
    pub fn load(path: &str, chroot_dir: &Path) -> Result<Self, AuthError> {
        let content = fs::read_to_string(path).map_err(|source| AuthError::PasswdRead {
            path: path.to_string(),
            source,
        })?;
        let authenticator = Self::parse(&content, chroot_dir)?;
        info!(
            "Loaded {} account(s) from passwd file {}",
            authenticator.entries.len(),
            path
        );
        Ok(authenticator)
    }

    pub fn parse(content: &str, chroot_dir: &Path) -> Result<Self, AuthError> {
        let username_re =
            Regex::new(USERNAME_REGEX).map_err(|e| AuthError::Backend(e.to_string()))?;
        let mut entries = HashMap::new();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match PasswdEntry::from_line(line) {
                Some(entry) if username_re.is_match(entry.get_username()) => {
                    entries.insert(entry.get_username().to_string(), entry);
                }
                Some(entry) => {
                    warn!(
                        "passwd line {}: invalid username {:?}, skipped",
                        number + 1,
                        entry.get_username()
                    );
                }
                None => warn!("passwd line {}: malformed entry, skipped", number + 1),
            }
        }

        let cost = entries
            .values()
            .find_map(|entry| hash_cost(entry.get_hashed_password()))
            .unwrap_or(DEFAULT_COST);
        let dummy_hash =
            hash(DUMMY_PASSWORD, cost).map_err(|e| AuthError::Backend(e.to_string()))?;

        Ok(Self {
            entries,
            chroot_dir: chroot_dir.to_path_buf(),
            dummy_hash,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn home_dir_for(&self, entry: &PasswdEntry) -> PathBuf {
        let home = Path::new(entry.get_home_dir());
        if home.is_absolute() {
            home.to_path_buf()
        } else {
            self.chroot_dir.join(home)
        }
    }
}

#[async_trait]
impl Authenticator for PasswdAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<FtpUser, AuthError> {
        let Some(entry) = self.entries.get(username).cloned() else {
            verify_blocking(password, &self.dummy_hash).await?;
            return Err(AuthError::UnknownUser(username.to_string()));
        };

        if !verify_blocking(password, entry.get_hashed_password()).await? {
            return Err(AuthError::InvalidPassword(username.to_string()));
        }

        Ok(FtpUser::new(
            entry.get_username(),
            entry.get_hashed_password(),
            self.home_dir_for(&entry),
        ))
    }
}
