//! Stateful read access to a list resource
//!
//! A [`ResourceClient`] owns a `{data, error, is_loading}` triple that
//! presentation code can snapshot or subscribe to, and a single mutating
//! operation, [`ResourceClient::fetch_data`].
//!
//! Overlapping fetches on one client follow a latest-call-wins policy: only
//! the most recently started call writes its outcome into the state, while
//! older calls still return their own result to their callers. Dropping an
//! in-flight fetch cancels it; if it was the latest call, `is_loading` is
//! reset.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use super::error::{ClientError, ErrorKind};
use super::ApiClient;

/// Error value recorded in [`ResourceState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl From<&ClientError> for FetchError {
    fn from(err: &ClientError) -> Self {
        Self {
            kind: err.kind(),
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Observable state of a [`ResourceClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceState<T> {
    /// Last successfully fetched items, or the seed
    pub data: Vec<T>,
    /// Last recorded bad-request error, cleared by a successful fetch
    pub error: Option<FetchError>,
    /// True while the latest fetch is in flight
    pub is_loading: bool,
}

impl<T> ResourceState<T> {
    const fn seeded(data: Vec<T>) -> Self {
        Self {
            data,
            error: None,
            is_loading: false,
        }
    }
}

/// Generic list reader with loading/error/data state
pub struct ResourceClient<T> {
    api: ApiClient,
    path: String,
    state: Arc<watch::Sender<ResourceState<T>>>,
    latest: Arc<AtomicU64>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            path: self.path.clone(),
            state: Arc::clone(&self.state),
            latest: Arc::clone(&self.latest),
        }
    }
}

impl<T> fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.api.base_url())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Stateful reader for `<base_url><path>`, starting from `seed`
    ///
    /// `path` is appended verbatim; include any query string yourself.
    pub fn resource<T>(&self, path: impl Into<String>, seed: Vec<T>) -> ResourceClient<T> {
        let (state, _) = watch::channel(ResourceState::seeded(seed));
        ResourceClient {
            api: self.clone(),
            path: path.into(),
            state: Arc::new(state),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<T> ResourceClient<T>
where
    T: DeserializeOwned + Clone,
{
    /// Fetch the resource and reconcile the state with the outcome
    ///
    /// On success the items replace `data` and `error` is cleared. A 400
    /// response is recorded in `error`; every other failure leaves `error`
    /// as it was. In all cases the outcome is also returned.
    pub async fn fetch_data(&self) -> Result<Vec<T>, ClientError> {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
        });
        let mut guard = LoadingGuard {
            state: &self.state,
            latest: &self.latest,
            ticket,
            armed: true,
        };

        debug!(path = %self.path, ticket, "fetching resource");
        let request = self.api.request(Method::GET, &self.path);
        let result = self.api.execute::<Vec<T>>(request).await;
        guard.armed = false;

        let recorded = result
            .as_ref()
            .err()
            .filter(|err| err.is_bad_request())
            .map(FetchError::from);

        let applied = self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                return false;
            }
            match &result {
                Ok(items) => {
                    state.data = items.clone();
                    state.error = None;
                }
                Err(_) => {
                    if let Some(error) = recorded {
                        state.error = Some(error);
                    }
                }
            }
            state.is_loading = false;
            true
        });

        if !applied {
            debug!(path = %self.path, ticket, "discarding outcome of superseded fetch");
        }
        if let Err(err) = &result {
            warn!(path = %self.path, error = %err, "resource fetch failed");
        }

        result
    }
}

impl<T: Clone> ResourceClient<T> {
    /// Snapshot of the whole state
    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// Current items
    pub fn data(&self) -> Vec<T> {
        self.state.borrow().data.clone()
    }
}

impl<T> ResourceClient<T> {
    /// Relative path this client reads
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last recorded error
    pub fn error(&self) -> Option<FetchError> {
        self.state.borrow().error.clone()
    }

    /// Whether the latest fetch is still in flight
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }
}

/// Resets `is_loading` if a fetch future is dropped before it resolves
struct LoadingGuard<'a, T> {
    state: &'a watch::Sender<ResourceState<T>>,
    latest: &'a AtomicU64,
    ticket: u64,
    armed: bool,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let ticket = self.ticket;
        let latest = self.latest;
        self.state.send_if_modified(|state| {
            if latest.load(Ordering::SeqCst) != ticket || !state.is_loading {
                return false;
            }
            state.is_loading = false;
            true
        });
        debug!(ticket, "fetch cancelled");
    }
}
