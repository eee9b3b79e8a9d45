//! Type definitions for the Trakt client
//!
//! This module contains the media items, lists and request/response bodies
//! exchanged with the API.

pub mod item;
pub mod list;
pub mod request;
pub mod response;

pub use item::{Ids, Item, ItemSpec, Media};
pub use list::{ListIds, TraktList, WATCHLIST_SLUG};
pub use request::{AuthCodesBody, AuthTokensBody, ItemsBody, ListAddBody};
pub use response::{AuthCodes, AuthTokens, NotFoundItems, SyncCounts, SyncResult};
