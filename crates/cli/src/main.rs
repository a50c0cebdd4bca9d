//! Tally CLI - admin client for the financial-management backend

mod commands;
mod logging;
mod session_file;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use tally_core::TallyConfig;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Admin client for the Tally financial-management backend")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true, env = "TALLY_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into())?;

    let mut config = match &cli.config {
        Some(path) => TallyConfig::from_file(path)?,
        None => TallyConfig::from_env()?,
    };
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    debug!(base_url = %config.api.base_url, "configuration loaded");

    if let Err(e) = cli.command.execute(&config).await {
        error!("Command failed: {e}");
        std::process::exit(1);
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
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
