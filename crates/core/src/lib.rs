//! Chatdesk core types and utilities

pub mod error;
pub mod logging;
pub mod state_dir;

pub use error::{CoreError, CoreResult};
pub use logging::{InstrumentationConfig, init_tracing};
pub use state_dir::StateDir;
