//! Shared logging setup for Chatdesk binaries
//!
//! Library crates only emit events through `tracing` macros; binaries call
//! [`init_tracing`] once at startup to install a subscriber.

pub mod config;
pub mod init;

pub use config::InstrumentationConfig;
pub use init::init_tracing;
