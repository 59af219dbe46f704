use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::error::CredentialError;
use crate::model::Credentials;

use super::traits::CredentialStore;

/// Stores each provider's credentials as a JSON file named after its token
/// (e.g. `~/.github_token`).
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    /// Store rooted at the user's home directory
    pub fn new() -> Result<Self, CredentialError> {
        let dir = dirs::home_dir().ok_or(CredentialError::NoHomeDir)?;
        Ok(Self { dir })
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, token: &str) -> PathBuf {
        self.dir.join(token)
    }
}

impl CredentialStore for FileCredentialStore {
    fn is_initialized(&self, token: &str) -> bool {
        self.path_for(token).is_file()
    }

    fn get(&self, token: &str) -> Result<Credentials, CredentialError> {
        let path = self.path_for(token);
        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CredentialError::Missing(token.to_string()),
            _ => CredentialError::Malformed {
                token: token.to_string(),
                reason: e.to_string(),
            },
        })?;

        debug!(path = %path.display(), "Read credentials");

        serde_json::from_str(&raw).map_err(|e| CredentialError::Malformed {
            token: token.to_string(),
            reason: e.to_string(),
        })
    }

    fn set(&self, token: &str, credentials: &Credentials) -> Result<(), CredentialError> {
        let path = self.path_for(token);
        let json = serde_json::to_string(credentials).map_err(|e| CredentialError::Malformed {
            token: token.to_string(),
            reason: e.to_string(),
        })?;

        fs::write(&path, json)?;
        restrict_permissions(&path)?;

        info!(path = %path.display(), "Stored credentials");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Credential store held in memory, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<Mutex<HashMap<String, Credentials>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, token: &str, credentials: Credentials) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.to_string(), credentials);
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn is_initialized(&self, token: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(token)
    }

    fn get(&self, token: &str) -> Result<Credentials, CredentialError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(token)
            .cloned()
            .ok_or_else(|| CredentialError::Missing(token.to_string()))
    }

    fn set(&self, token: &str, credentials: &Credentials) -> Result<(), CredentialError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.to_string(), credentials.clone());
        Ok(())
    }
}
