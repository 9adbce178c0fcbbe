//! Credential storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where session tokens and the active organization are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// OS keychain, falling back to files when the keychain is unavailable.
    #[default]
    Keyring,
    /// Plain files under `credentials_dir` (`0600` on Unix).
    File,
    /// Process memory only; nothing survives the process.
    Memory,
}

fn default_keyring_service() -> String {
    "imagine-cli".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Keychain service name. Override for tests to avoid touching real credentials.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Directory for file-backed credentials. Empty means `~/.imagine`.
    #[serde(default)]
    pub credentials_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            keyring_service: default_keyring_service(),
            credentials_dir: String::new(),
        }
    }
}

impl StorageConfig {
    /// Resolved credentials directory, `None` when no home directory exists.
    #[must_use]
    pub fn credentials_dir(&self) -> Option<PathBuf> {
        if self.credentials_dir.trim().is_empty() {
            dirs::home_dir().map(|home| home.join(".imagine"))
        } else {
            Some(PathBuf::from(self.credentials_dir.trim()))
        }
    }
}
