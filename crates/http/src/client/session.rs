//! Shared authentication session
//!
//! A [`Session`] is the explicit, reference-counted owner of the credential
//! store. Every [`ApiClient`](super::ApiClient) built with the same
//! `Arc<Session>` sees the same tokens and shares one refresh lock, so
//! concurrent 401s collapse into a single refresh call.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{Mutex, MutexGuard};

use super::error::ClientError;
use super::token_store::{MemoryTokenStore, TokenPair, TokenStore};

/// Callback fired when the session is cleared after a failed refresh
pub type ExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Credential state shared by all clients of one logged-in user
pub struct Session {
    store: Arc<dyn TokenStore>,
    refresh_lock: Mutex<()>,
    expired_hook: RwLock<Option<ExpiredHook>>,
}

impl Session {
    /// Create a session backed by the given store
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            refresh_lock: Mutex::new(()),
            expired_hook: RwLock::new(None),
        }
    }

    /// Session that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Current credential pair
    pub async fn tokens(&self) -> Result<Option<TokenPair>, ClientError> {
        self.store.get().await
    }

    /// Current access token
    pub async fn access_token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.store.get().await?.map(|pair| pair.access_token))
    }

    /// Whether a credential pair is stored
    pub async fn is_authenticated(&self) -> Result<bool, ClientError> {
        Ok(self.store.get().await?.is_some())
    }

    /// Replace the credential pair
    pub async fn set_tokens(&self, pair: TokenPair) -> Result<(), ClientError> {
        self.store.set(pair).await
    }

    /// Drop both credentials
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.store.clear().await
    }

    /// Register a callback for when re-login becomes necessary
    pub fn set_expired_hook(&self, hook: ExpiredHook) {
        *self
            .expired_hook
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(hook);
    }

    /// Remove the expiry callback
    pub fn clear_expired_hook(&self) {
        *self
            .expired_hook
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn notify_expired(&self) {
        let hook = self
            .expired_hook
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Serializes refresh attempts across every client of this session
    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_lock.lock().await
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_hook = self
            .expired_hook
            .read()
            .map(|hook| hook.is_some())
            .unwrap_or(false);
        f.debug_struct("Session")
            .field("has_expired_hook", &has_hook)
            .finish_non_exhaustive()
    }
}
