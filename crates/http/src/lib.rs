//! Chatdesk HTTP client
//!
//! Authenticated access to the Chatdesk REST API: a token-carrying request
//! pipeline that transparently refreshes expired access tokens, and a generic
//! [`client::ResourceClient`] that exposes loading/error/data state to
//! presentation code.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod types;

pub use client::error::{ClientError, ErrorKind};
pub use client::{ApiClient, ApiClientBuilder, ClientConfig};
pub use client::resource::{FetchError, ResourceClient, ResourceState};
pub use client::session::Session;
pub use client::token_store::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
