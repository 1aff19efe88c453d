//! Credential storage
//!
//! A [`TokenStore`] holds at most one [`TokenPair`]. The interceptor reads it
//! before every request and rewrites it after a refresh; nothing tracks
//! expiry locally, an expired access token is only discovered when the server
//! rejects it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::error::ClientError;

/// Access and refresh credentials issued together at login
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Storage backend for the active credential pair
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current pair, if logged in
    async fn get(&self) -> Result<Option<TokenPair>, ClientError>;

    /// Replace the stored pair
    async fn set(&self, pair: TokenPair) -> Result<(), ClientError>;

    /// Forget both credentials
    async fn clear(&self) -> Result<(), ClientError>;
}

/// Process-local token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    pair: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing pair
    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<TokenPair>, ClientError> {
        Ok(self.pair.read().await.clone())
    }

    async fn set(&self, pair: TokenPair) -> Result<(), ClientError> {
        *self.pair.write().await = Some(pair);
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        *self.pair.write().await = None;
        Ok(())
    }
}

/// Token store persisted as a JSON file so the session survives restarts
///
/// The file is read once when the store is opened; every `set`/`clear`
/// writes through to disk before updating the cached pair.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    pair: RwLock<Option<TokenPair>>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading any previously saved pair
    ///
    /// A missing file means no session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the file exists but cannot be read
    /// or does not contain a valid pair.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let pair = match tokio::fs::read_to_string(&path).await {
            Ok(content) => Some(serde_json::from_str(&content).map_err(|e| {
                ClientError::Storage(format!("corrupt session file {}: {e}", path.display()))
            })?),
            Err(e) if e.kind() == IoErrorKind::NotFound => None,
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), has_session = pair.is_some(), "opened token store");
        Ok(Self {
            path,
            pair: RwLock::new(pair),
        })
    }

    /// Location of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_file(&self, pair: &TokenPair) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ClientError::Storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        // Write to a sibling file first so a crash never leaves half a session
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(pair)?;
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| ClientError::Storage(format!("failed to write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            ClientError::Storage(format!("failed to replace {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<TokenPair>, ClientError> {
        Ok(self.pair.read().await.clone())
    }

    async fn set(&self, pair: TokenPair) -> Result<(), ClientError> {
        let mut guard = self.pair.write().await;
        self.write_file(&pair).await?;
        *guard = Some(pair);
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        let mut guard = self.pair.write().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == IoErrorKind::NotFound => {}
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "failed to remove {}: {e}",
                    self.path.display()
                )));
            }
        }
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert!(store.get().await.unwrap().is_none());

        store.set(TokenPair::new("a1", "r1")).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(TokenPair::new("a1", "r1")));

        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileTokenStore::open(&path).await.unwrap();
        assert!(store.get().await.unwrap().is_none());
        store.set(TokenPair::new("a1", "r1")).await.unwrap();
        drop(store);

        let reopened = FileTokenStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get().await.unwrap(),
            Some(TokenPair::new("a1", "r1"))
        );
    }

    #[tokio::test]
    async fn test_file_store_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileTokenStore::open(&path).await.unwrap();
        store.set(TokenPair::new("a1", "r1")).await.unwrap();
        assert!(path.exists());

        store.clear().await.unwrap();
        assert!(!path.exists());
        assert!(store.get().await.unwrap().is_none());

        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let result = FileTokenStore::open(&path).await;
        assert!(matches!(result, Err(ClientError::Storage(_))));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let rendered = format!("{:?}", TokenPair::new("secret-access", "secret-refresh"));
        assert!(!rendered.contains("secret"));
    }
}
