//! Persistence for the login credential, so a session survives restarts.
//!
//! [`FileCredentialStore`] keeps it in a JSON file readable only by the owner;
//! [`MemoryCredentialStore`] keeps it for the life of the process.

use super::SessionError;
use crate::model::Credential;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Where a [`Session`](super::Session) keeps its credential between runs.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, SessionError>;

    fn save(&self, credential: &Credential) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// Credential kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/portfolio-admin/credential.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("portfolio-admin").join("credential.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(storage_error)?;
        let credential = serde_json::from_str(&contents).map_err(storage_error)?;
        Ok(Some(credential))
    }

    fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(storage_error)?;
        }
        let contents = serde_json::to_string_pretty(credential).map_err(storage_error)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only from the moment the file exists
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(storage_error)?;

        // `mode` only applies on creation; tighten a file left by an older run
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(storage_error)?;
        }

        file.write_all(contents.as_bytes()).map_err(storage_error)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

/// Credential kept in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<Mutex<Option<Credential>>>,
}

impl MemoryCredentialStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(credential))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, SessionError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

fn storage_error(e: impl std::fmt::Display) -> SessionError {
    SessionError::Storage(e.to_string())
}
