//! Persisted credentials and the session store abstraction

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::Result;

/// Client-side persisted credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoredCredentials {
    /// Base64-encoded secret key of an anonymous account
    Anonymous { secret_key: String },
    /// Wallet address and opaque auth token of a delegated account
    Delegated { address: String, token: String },
}

/// Storage for session credentials
pub trait SessionStore {
    fn load(&self) -> Result<Option<StoredCredentials>>;
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Session store backed by a JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let credentials = serde_json::from_str(&content)?;
        Ok(Some(credentials))
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(credentials)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        (**self).load()
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        (**self).save(credentials)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// In-memory session store for tests
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<StoredCredentials>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
        Ok(())
    }
}
