//! CLI configuration loading

use anyhow::{Context, Result};
use chatdesk_core::StateDir;
use chatdesk_http::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment overrides, e.g. `CHATDESK_API__BASE_URL`
const ENV_PREFIX: &str = "CHATDESK";

/// Settings assembled from defaults, config file and environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API connection settings
    pub api: ClientConfig,
}

impl Settings {
    /// Load settings, later sources overriding earlier ones:
    /// built-in defaults, then the config file, then `CHATDESK_*` variables.
    ///
    /// An explicitly passed file must exist; the default file under the
    /// config directory is optional.
    pub fn load(path: Option<&Path>, state_dir: &StateDir) -> Result<Self> {
        let defaults = ClientConfig::default();

        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::from(state_dir.config_file()).required(false),
        };

        let settings = ::config::Config::builder()
            // Set default values
            .set_default("api.base_url", defaults.base_url)?
            .set_default("api.token_path", defaults.token_path)?
            .set_default("api.refresh_path", defaults.refresh_path)?
            .set_default("api.timeout_secs", defaults.timeout_secs)?
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to load configuration")?;

        Ok(settings.try_deserialize()?)
    }
}
