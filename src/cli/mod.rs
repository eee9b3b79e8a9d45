//! Command-line interface of the `trakt-sync` binary
//!
//! Argument parsing and logging setup live here; [`commands`] holds the
//! logic of each subcommand.

pub mod commands;

use crate::config::LoggingSettings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "trakt-sync")]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/trakt-sync/config.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every list owned by the signed-in user
    Lists,
    /// Fetch the watchlist
    Watchlist,
    /// Fetch all ratings
    Ratings,
    /// Fetch the watch history of one item
    History {
        /// Item type: movie, show or episode
        #[arg(value_name = "TYPE")]
        item_type: String,
        /// Item id, e.g. an IMDb id
        #[arg(value_name = "ID")]
        item_id: String,
    },
}

/// Install the stderr subscriber
///
/// `RUST_LOG` wins; otherwise `--verbose` selects `debug` and the
/// configured level applies.
pub fn init_logging(verbose: bool, logging: &LoggingSettings) {
    let fallback = if verbose || logging.verbose {
        "debug".to_string()
    } else {
        logging.level.clone()
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
