// 🔑 Credential Store - the shared secret, persisted between runs
//
// Stored as {"password": "..."} in the user's config dir. Cleared on any
// authentication failure so the next action prompts for a fresh login.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

const APP_DIR: &str = "pokeprio";
const CREDENTIAL_FILE: &str = "credential.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    password: String,
}

#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    password: Option<String>,
}

impl CredentialStore {
    /// `{config_dir}/pokeprio/credential.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(CREDENTIAL_FILE);
        path
    }

    /// Open the store, loading a saved credential if one exists.
    /// An unreadable file is treated as logged out.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let password = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoredCredential>(&raw) {
                Ok(stored) if !stored.password.is_empty() => Some(stored.password),
                Ok(_) => None,
                Err(err) => {
                    warn!(path = %path.display(), "ignoring malformed credential file: {err}");
                    None
                }
            },
            Err(_) => None,
        };

        Self { path, password }
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.password.is_some()
    }

    pub fn set(&mut self, password: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let payload = serde_json::to_string(&StoredCredential {
            password: password.to_string(),
        })?;
        fs::write(&self.path, payload)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        self.password = Some(password.to_string());
        debug!(path = %self.path.display(), "credential stored");
        Ok(())
    }

    /// Forget the credential. The in-memory copy is dropped even if the
    /// file cannot be removed.
    pub fn clear(&mut self) -> Result<()> {
        self.password = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pokeprio-test-{}-{}", std::process::id(), name))
            .join(CREDENTIAL_FILE)
    }

    #[test]
    fn test_set_persists_across_open() {
        let path = temp_path("persist");
        let mut store = CredentialStore::open(&path);
        assert!(!store.is_logged_in());

        store.set("hunter2").unwrap();
        let reopened = CredentialStore::open(&path);
        assert_eq!(reopened.password(), Some("hunter2"));

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["password"], "hunter2");

        store.clear().unwrap();
        assert!(!CredentialStore::open(&path).is_logged_in());
    }

    #[test]
    fn test_clear_without_file() {
        let mut store = CredentialStore::open(temp_path("never-written"));
        store.clear().unwrap();
        assert!(store.password().is_none());
    }

    #[test]
    fn test_malformed_file_means_logged_out() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        assert!(!CredentialStore::open(&path).is_logged_in());
    }
}
