//! Command Line and Logging
//!
//! Command-line interface and logging setup for the COSMIC dialer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// COSMIC dialer command-line interface
#[derive(Parser, Debug)]
#[command(name = "cosmic-dialer")]
#[command(about = "Contact list and simulated calls for COSMIC Desktop", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable JSON structured logging
    #[arg(long)]
    pub json_logs: bool,

    /// Show timestamps in logs
    #[arg(long)]
    pub timestamps: bool,

    /// Command to run (defaults to `demo`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List contacts, marking favorites
    Contacts {
        /// Wait for a pull-to-refresh instead of a plain load
        #[arg(long)]
        refresh: bool,
    },

    /// Call a contact by phone number
    Call {
        /// Phone number of a listed contact
        phone: String,

        /// Hang up after this many seconds (waits for Ctrl-C if unset)
        #[arg(long, value_name = "SECS")]
        hang_up_after: Option<u64>,
    },

    /// Walk through the whole flow: list, favorite, theme and a short call
    Demo,

    /// Show current configuration
    DumpConfig,
}

/// Initialize logging based on CLI configuration
pub fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = cli.log_level.parse::<Level>().with_context(|| {
        format!(
            "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
            cli.log_level
        )
    })?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.as_str()))
        .context("Failed to create log filter")?;

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    match (cli.json_logs, cli.timestamps) {
        (true, true) => subscriber.json().init(),
        (true, false) => subscriber.without_time().json().init(),
        (false, true) => subscriber.init(),
        (false, false) => subscriber.without_time().init(),
    }

    info!(
        "Logging initialized: level={}, json={}, timestamps={}",
        log_level, cli.json_logs, cli.timestamps
    );

    Ok(())
}
