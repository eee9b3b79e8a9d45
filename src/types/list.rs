//! List type definitions
//!
//! The watchlist and user-defined lists share one shape; the watchlist is a
//! pseudo-list with a fixed slug and the `is_watchlist` flag set.

use super::item::Item;
use serde::{Deserialize, Serialize};

/// Slug of the watchlist pseudo-list
pub const WATCHLIST_SLUG: &str = "watchlist";

/// Identifiers of a list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    #[serde(default)]
    pub slug: String,
}

impl ListIds {
    pub fn from_slug(slug: impl Into<String>) -> Self {
        Self {
            trakt: None,
            slug: slug.into(),
        }
    }

    /// Path segment addressing the list: the slug, else the numeric id
    pub fn identifier(&self) -> String {
        match (self.slug.is_empty(), self.trakt) {
            (true, Some(id)) => id.to_string(),
            _ => self.slug.clone(),
        }
    }
}

/// A watchlist or user list with its items
///
/// List metadata responses decode into this type with `items` left empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraktList {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ids: ListIds,
    #[serde(default, skip_deserializing)]
    pub is_watchlist: bool,
    #[serde(default, skip_deserializing)]
    pub items: Vec<Item>,
}

impl TraktList {
    /// User list identified by `ids`
    pub fn new(ids: ListIds, items: Vec<Item>) -> Self {
        Self {
            name: None,
            description: None,
            ids,
            is_watchlist: false,
            items,
        }
    }

    /// The watchlist pseudo-list
    pub fn watchlist(items: Vec<Item>) -> Self {
        Self {
            name: Some("Watchlist".to_string()),
            description: None,
            ids: ListIds::from_slug(WATCHLIST_SLUG),
            is_watchlist: true,
            items,
        }
    }

    pub fn slug(&self) -> &str {
        &self.ids.slug
    }
}
