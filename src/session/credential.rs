//! Persisted bearer credential
//!
//! The token lives outside process memory so a restart keeps the user
//! logged in. The file backend uses atomic writes (write-to-temp +
//! rename) to prevent corruption on crashes.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Storage for the opaque bearer token.
///
/// Only the gateway (on a 401) and the session store (on login/logout)
/// may mutate the credential; every other component only reads it.
pub trait CredentialStore: Send + Sync {
    /// The stored token, if any. Absence means logged out.
    fn load(&self) -> Option<String>;

    /// Persist a token, replacing any previous one.
    fn store(&self, token: &str);

    /// Erase the token. Idempotent: repeated clears are harmless.
    fn clear(&self);
}

/// On-disk credential file format.
#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    version: u32,
    token: String,
}

/// File-backed credential store.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let file: CredentialFile = match serde_json::from_str(&raw) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "unreadable credential file");
                return None;
            }
        };
        if file.token.is_empty() {
            None
        } else {
            Some(file.token)
        }
    }

    fn store(&self, token: &str) {
        let file = CredentialFile { version: 1, token: token.to_string() };
        let contents = match serde_json::to_string_pretty(&file) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::error!(%err, "failed to serialize credential");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::error!(path = %parent.display(), %err, "failed to create storage dir");
                return;
            }
        }
        let tmp = self.path.with_extension("tmp");
        let result = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, &self.path));
        if let Err(err) = result {
            tracing::error!(path = %self.path.display(), %err, "failed to persist credential");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to remove credential")
            }
        }
    }
}

/// In-memory credential store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self { token: RwLock::new(Some(token.to_string())) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn store(&self, token: &str) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
