//! File-based credential storage
//!
//! The API key lives in `~/.exa-auth.json` as `{"api_key": "..."}`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Credential file name under the home directory
pub const CREDENTIAL_FILE_NAME: &str = ".exa-auth.json";

/// On-disk credential document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub api_key: String,
}

/// Reads and writes the credential file
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.exa-auth.json`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self::new(home.join(CREDENTIAL_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored key
    ///
    /// Returns `Ok(None)` when the file does not exist or holds an empty key.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!("No credential file at {:?}", self.path);
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credential file: {:?}", self.path))?;

        let config: AuthConfig = serde_json::from_str(&content)
            .with_context(|| "Failed to parse credential JSON")?;

        let key = config.api_key.trim().to_string();
        Ok(if key.is_empty() { None } else { Some(key) })
    }

    /// Save a key, readable only by the owner
    pub fn save(&self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            anyhow::bail!("API key cannot be empty");
        }

        let config = AuthConfig {
            api_key: api_key.to_string(),
        };
        let data = serde_json::to_string_pretty(&config)?;

        write_private(&self.path, data.as_bytes())
            .with_context(|| format!("Failed to write credential file: {:?}", self.path))?;

        info!("API key saved to {:?}", self.path);
        Ok(())
    }
}

#[cfg(unix)]
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(data)?;
    // an existing file keeps its old mode on open
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join(CREDENTIAL_FILE_NAME));

        assert_eq!(store.load().unwrap(), None);

        store.save("  exa-key-123 \n").unwrap();
        assert_eq!(store.load().unwrap(), Some("exa-key-123".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join(CREDENTIAL_FILE_NAME));
        store.save("exa-key-123").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_empty_key_rejected() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join(CREDENTIAL_FILE_NAME));
        assert!(store.save("   ").is_err());
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CREDENTIAL_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();
        assert!(CredentialStore::new(path).load().is_err());
    }
}
