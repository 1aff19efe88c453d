//! Initialization functions for tracing

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{CoreError, CoreResult};
use crate::logging::config::InstrumentationConfig;

/// Initialize tracing with the given configuration
///
/// `RUST_LOG` takes precedence over `config.log_level` when set. Events go to
/// stderr (when enabled) and, if `config.log_file` is set, to that file
/// without ANSI colors.
///
/// # Errors
///
/// Returns an error if `config.log_level` is not a valid filter, the log file
/// cannot be opened, or a global subscriber is already installed.
pub fn init_tracing(config: &InstrumentationConfig) -> CoreResult<()> {
    let env_filter = build_env_filter(config)?;

    let console_layer = config.console_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    let file_layer = match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CoreError::logging_error(e.to_string()))?;

    tracing::debug!(service = %config.service_name, "tracing initialized");
    Ok(())
}


fn build_env_filter(config: &InstrumentationConfig) -> CoreResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|e| {
        CoreError::invalid_config(format!("invalid log level `{}`: {e}", config.log_level))
    })
}
