use anyhow::Result;
use chatdesk_core::{InstrumentationConfig, init_tracing};
use std::path::PathBuf;
use tracing::Level;

/// Initialize logging for the CLI
///
/// Logs go to stderr so they never mix with command output on stdout, and
/// to `log_file` when one is given.
pub fn init_logging(log_level: Level, log_file: Option<PathBuf>) -> Result<()> {
    let level_str = log_level.as_str().to_lowercase();
    let mut config = InstrumentationConfig::from_env().with_log_level(format!(
        "chatdesk={level_str},chatdesk_core={level_str},chatdesk_http={level_str}"
    ));
    config.service_name = "chatdesk-cli".to_string();

    if let Some(path) = log_file {
        config = config.with_log_file(path);
    }

    init_tracing(&config)?;
    Ok(())
}
