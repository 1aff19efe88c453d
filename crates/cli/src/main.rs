//! Chatdesk CLI - browse chat servers from the terminal

mod commands;
mod config;
mod logging;

use anyhow::Result;
use chatdesk_core::StateDir;
use chatdesk_http::{ApiClient, FileTokenStore, Session};
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, error, info, warn};

#[derive(Parser)]
#[command(name = "chatdesk")]
#[command(about = "Command-line client for the Chatdesk chat API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Directory holding configuration, session and logs
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to <config dir>/chatdesk.toml when present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let state_dir = cli
        .data_dir
        .clone()
        .map_or_else(StateDir::new, StateDir::with_override);
    state_dir.ensure_dirs()?;

    let log_file = (!cli.no_file_log).then(|| state_dir.data_dir().join("cli.log"));
    logging::init_logging(cli.log_level.into(), log_file)?;

    let settings = config::Settings::load(cli.config.as_deref(), &state_dir)?;

    let store = FileTokenStore::open(state_dir.session_file()).await?;
    let session = Arc::new(Session::new(Arc::new(store)));
    session.set_expired_hook(Arc::new(|| {
        warn!("Session expired, run `chatdesk login` to sign in again");
    }));
    let client = ApiClient::from_config(&settings.api, session)?;

    info!(base_url = client.base_url(), "Starting Chatdesk CLI");

    match cli.command.execute(&client).await {
        Ok(()) => {
            info!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
