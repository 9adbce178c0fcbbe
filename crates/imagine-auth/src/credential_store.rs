//! Durable storage for session credentials.
//!
//! Three values are persisted under fixed keys and cleared together on
//! logout: the access token, the refresh token, and the selected
//! organization id.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use imagine_config::{StorageBackend, StorageConfig};

use crate::error::AuthError;

pub const ACCESS_TOKEN_KEY: &str = "imagineai_access_token";
pub const REFRESH_TOKEN_KEY: &str = "imagineai_refresh_token";
pub const ORGANIZATION_KEY: &str = "imagineai_org_id";

/// Every key the client persists.
pub const ALL_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ORGANIZATION_KEY];

/// Key/value persistence for credentials.
///
/// Implementations must be safe to share between the session store and the
/// organization context.
pub trait CredentialStore: Send + Sync {
    /// Load a value. Missing and empty values both return `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Persist a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), AuthError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` if an existing value cannot be removed.
    fn remove(&self, key: &str) -> Result<(), AuthError>;

    /// Short name shown by `imagine auth status`.
    fn backend_name(&self) -> &'static str;
}

/// Build the store selected by configuration.
///
/// # Errors
///
/// Returns `AuthError::CredentialStore` when a file-backed store is requested
/// but no credentials directory can be resolved.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn CredentialStore>, AuthError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::default())),
        StorageBackend::File => Ok(Arc::new(FileStore::new(resolve_dir(config)?))),
        StorageBackend::Keyring => Ok(Arc::new(KeyringStore::new(
            config.keyring_service.clone(),
            FileStore::new(resolve_dir(config)?),
        ))),
    }
}

fn resolve_dir(config: &StorageConfig) -> Result<PathBuf, AuthError> {
    config.credentials_dir().ok_or_else(|| {
        AuthError::CredentialStore("home directory not found — cannot store credentials".into())
    })
}

// ---------------------------------------------------------------------------
// Keyring
// ---------------------------------------------------------------------------

/// OS keychain storage. Falls back to files if the keychain is unavailable.
pub struct KeyringStore {
    service: String,
    fallback: FileStore,
}

impl KeyringStore {
    #[must_use]
    pub const fn new(service: String, fallback: FileStore) -> Self {
        Self { service, fallback }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(&self.service, key)
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, key: &str) -> Option<String> {
        if let Ok(entry) = self.entry(key) {
            if let Ok(value) = entry.get_password() {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        self.fallback.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        match self.entry(key) {
            Ok(entry) => match entry.set_password(value) {
                Ok(()) => Ok(()),
                Err(error) => {
                    tracing::warn!(%error, key, "keyring store failed; falling back to file");
                    self.fallback.set(key, value)
                }
            },
            Err(error) => {
                tracing::warn!(%error, key, "keyring unavailable; falling back to file");
                self.fallback.set(key, value)
            }
        }
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        // Missing keyring entries are fine.
        if let Ok(entry) = self.entry(key) {
            let _ = entry.delete_credential();
        }
        self.fallback.remove(key)
    }

    fn backend_name(&self) -> &'static str {
        "keyring"
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// One file per key under a private directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AuthError::CredentialStore(format!("mkdir {}: {e}", self.dir.display()))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", self.dir.display());
            }
        }

        let path = self.path(key);
        fs::write(&path, value)
            .map_err(|e| AuthError::CredentialStore(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::CredentialStore(format!("chmod {}: {e}", path.display()))
            })?;
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                AuthError::CredentialStore(format!("failed to delete {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
