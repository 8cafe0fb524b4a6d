use chrono::{DateTime, Utc};
use gatehouse_core::actor::SessionToken;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Token file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent slot for the continuation token of the current session
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionToken>, TokenStoreError>;
    fn save(&self, token: &SessionToken) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: SessionToken,
    pub saved_at: DateTime<Utc>,
}

/// Keeps the token in a JSON file readable by the owner only
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored record including its timestamp
    pub fn load_record(&self) -> Result<Option<StoredToken>, TokenStoreError> {
        if !self.path.exists() {
            tracing::debug!("No token file at {}", self.path.display());
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        let record: StoredToken = serde_json::from_str(&json)?;
        Ok(Some(record))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, TokenStoreError> {
        Ok(self.load_record()?.map(|record| record.token))
    }

    fn save(&self, token: &SessionToken) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let record = StoredToken {
            token: token.clone(),
            saved_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        tracing::debug!("Saved session token to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::debug!("Removed session token {}", self.path.display());
        }
        Ok(())
    }
}

/// Process-local token slot, for tests and embedders without a filesystem
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SessionToken>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, TokenStoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &SessionToken) -> Result<(), TokenStoreError> {
        *self.slot() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().unwrap().is_none());

        store.save(&SessionToken::new("gh1.abc.def.ghi")).unwrap();
        let record = store.load_record().unwrap().unwrap();
        assert_eq!(record.token.expose_secret(), "gh1.abc.def.ghi");
        assert!(record.saved_at <= Utc::now());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        store.save(&SessionToken::new("gh1.abc.def.ghi")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(store.load(), Err(TokenStoreError::Json(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::default();
        assert!(store.load().unwrap().is_none());

        store.save(&SessionToken::new("t-1")).unwrap();
        assert_eq!(store.load().unwrap(), Some(SessionToken::new("t-1")));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
