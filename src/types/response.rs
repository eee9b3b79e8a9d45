//! Response type definitions
//!
//! Decoded bodies of the device-code, token and sync endpoints.

use super::item::ItemSpec;
use serde::{Deserialize, Serialize};

/// Codes issued by the device-code endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCodes {
    pub device_code: String,
    pub user_code: String,
    #[serde(default)]
    pub verification_url: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub interval: Option<u64>,
}

/// Tokens issued in exchange for an approved device code
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Per-category counts of a sync receipt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncCounts {
    pub movies: u32,
    pub shows: u32,
    pub seasons: u32,
    pub episodes: u32,
    pub people: u32,
}

/// Entries the service could not match, grouped by media kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotFoundItems {
    pub movies: Vec<ItemSpec>,
    pub shows: Vec<ItemSpec>,
    pub seasons: Vec<ItemSpec>,
    pub episodes: Vec<ItemSpec>,
}

impl NotFoundItems {
    /// Not-found counts per category
    pub fn counts(&self) -> SyncCounts {
        SyncCounts {
            movies: self.movies.len() as u32,
            shows: self.shows.len() as u32,
            seasons: self.seasons.len() as u32,
            episodes: self.episodes.len() as u32,
            people: 0,
        }
    }
}

/// Receipt returned by add/remove calls, used only for reporting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncResult {
    pub added: SyncCounts,
    pub deleted: SyncCounts,
    pub existing: SyncCounts,
    pub not_found: NotFoundItems,
}
