//! `trakt-sync` binary
//!
//! Signs in to Trakt with the configured account and prints JSON summaries
//! of the user's lists, watchlist, ratings or history.
//!
//! # Usage
//!
//! ```bash
//! TRAKT_SYNC_MODE=dry-run trakt-sync lists
//! trakt-sync --config ./trakt.toml history movie tt0068646
//! ```

use clap::Parser;
use trakt_sync_client::cli::{Cli, commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    commands::run(Cli::parse()).await
}
