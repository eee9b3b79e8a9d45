//! Trakt sync client
//!
//! A resilient client for the Trakt media-tracking service, built for
//! unattended sync jobs.
//!
//! # Architecture
//!
//! - **Request engine** ([`session::RequestEngine`]): sends each request,
//!   replaying it on 429 after the server's `Retry-After` delay and
//!   classifying every other status into a response or a typed [`Error`].
//! - **Sign-in** ([`session::AuthFlow`]): obtains a bearer token by driving
//!   the device-code approval through the website's forms, the way a
//!   browser would.
//! - **Sync operations** ([`TraktClient`]): get/add/remove over the
//!   watchlist, user lists, ratings and history. Mutations are gated by the
//!   [`SyncMode`].
//! - **List fetcher** ([`TraktClient::lists_get`]): fetches many lists
//!   concurrently, skipping lists deleted in the meantime.
//!
//! # Examples
//!
//! ```rust,no_run
//! use trakt_sync_client::{ConfigLoader, TraktClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = ConfigLoader::new().from_env_only()?;
//! let client = TraktClient::new(&settings).await?;
//!
//! let watchlist = client.watchlist_get().await?;
//! println!("{} items on the watchlist", watchlist.items.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use client::{Mutation, MutationOutcome, SyncMode, TraktApi, TraktClient};
pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use session::Session;
pub use types::{Ids, Item, ListIds, Media, SyncResult, TraktList};
