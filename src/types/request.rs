//! Request type definitions
//!
//! JSON bodies sent to the device-code, token and sync endpoints.

use super::item::{Item, ItemSpec, Media};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of the device-code request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCodesBody {
    pub client_id: String,
}

/// Body of the device-code for access-token exchange
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthTokensBody {
    pub code: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Sync request body grouping items by media kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsBody {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub movies: Vec<ItemSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shows: Vec<ItemSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub episodes: Vec<ItemSpec>,
}

impl ItemsBody {
    pub fn len(&self) -> usize {
        self.movies.len() + self.shows.len() + self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&[Item]> for ItemsBody {
    fn from(items: &[Item]) -> Self {
        let mut body = Self::default();
        for item in items {
            match item.to_body_entry() {
                Media::Movie(spec) => body.movies.push(spec),
                Media::Show(spec) => body.shows.push(spec),
                Media::Episode(spec) => body.episodes.push(spec),
            }
        }
        body
    }
}

/// Body of the list creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAddBody {
    pub name: String,
    pub description: String,
    pub privacy: String,
    pub display_numbers: bool,
    pub allow_comments: bool,
    pub sort_by: String,
    pub sort_how: String,
}

impl ListAddBody {
    /// Public, rank-sorted list whose description records when it was created
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            description: format!(
                "list auto imported by {} on {}",
                env!("CARGO_PKG_NAME"),
                created_at.to_rfc2822()
            ),
            privacy: "public".to_string(),
            display_numbers: false,
            allow_comments: true,
            sort_by: "rank".to_string(),
            sort_how: "asc".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::item::Ids;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_movie_only_item_maps_to_single_movie_entry() {
        let items = vec![Item::movie(Ids::imdb("tt0111161"))];
        let body = ItemsBody::from(items.as_slice());

        assert_eq!(body.movies, vec![ItemSpec::with_ids(Ids::imdb("tt0111161"))]);
        assert!(body.shows.is_empty());
        assert!(body.episodes.is_empty());

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"movies": [{"ids": {"imdb": "tt0111161"}}]}));
    }

    #[test]
    fn test_mixed_items_are_grouped_in_order() {
        let items = vec![
            Item::show(Ids::imdb("tt1")),
            Item::movie(Ids::imdb("tt2")),
            Item::episode(Ids::imdb("tt3")),
            Item::movie(Ids::imdb("tt4")),
        ];
        let body = ItemsBody::from(items.as_slice());

        assert_eq!(body.len(), 4);
        assert_eq!(body.movies[0].ids.imdb.as_deref(), Some("tt2"));
        assert_eq!(body.movies[1].ids.imdb.as_deref(), Some("tt4"));
        assert_eq!(body.shows.len(), 1);
        assert_eq!(body.episodes.len(), 1);
    }

    #[test]
    fn test_list_add_body_template() {
        let created_at = "2024-03-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let body = ListAddBody::new("Favourites", created_at);

        assert_eq!(body.privacy, "public");
        assert!(!body.display_numbers);
        assert!(body.allow_comments);
        assert_eq!(body.sort_by, "rank");
        assert_eq!(body.sort_how, "asc");
        assert!(body.description.contains("Mar 2024 12:00:00 +0000"));
    }
}
