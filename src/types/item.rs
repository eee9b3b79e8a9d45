//! Media item types
//!
//! An [`Item`] is exactly one of a movie, show or episode, together with the
//! per-collection metadata (listing, rating and watch timestamps) the API
//! attaches to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// External identifiers of a movie, show or episode
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Ids {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u64>,
}

impl Ids {
    /// Identifiers carrying only an IMDb id
    pub fn imdb(id: impl Into<String>) -> Self {
        Self {
            imdb: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Movie, show or episode payload as exchanged with the sync endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default)]
    pub ids: Ids,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
}

impl ItemSpec {
    /// Payload identified by `ids` alone
    pub fn with_ids(ids: Ids) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }
}

/// The single populated media variant of an item
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Movie(ItemSpec),
    Show(ItemSpec),
    Episode(ItemSpec),
}

impl Media {
    /// API type name (`movie`, `show`, `episode`)
    pub fn type_name(&self) -> &'static str {
        match self {
            Media::Movie(_) => "movie",
            Media::Show(_) => "show",
            Media::Episode(_) => "episode",
        }
    }

    pub fn spec(&self) -> &ItemSpec {
        match self {
            Media::Movie(spec) | Media::Show(spec) | Media::Episode(spec) => spec,
        }
    }

    fn spec_mut(&mut self) -> &mut ItemSpec {
        match self {
            Media::Movie(spec) | Media::Show(spec) | Media::Episode(spec) => spec,
        }
    }
}

/// An entry of a watchlist, list, ratings or history collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawItem", into = "RawItem")]
pub struct Item {
    pub media: Media,
    pub listed_at: Option<DateTime<Utc>>,
    pub rated_at: Option<DateTime<Utc>>,
    pub rating: Option<u8>,
    pub watched_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(media: Media) -> Self {
        Self {
            media,
            listed_at: None,
            rated_at: None,
            rating: None,
            watched_at: None,
        }
    }

    pub fn movie(ids: Ids) -> Self {
        Self::new(Media::Movie(ItemSpec::with_ids(ids)))
    }

    pub fn show(ids: Ids) -> Self {
        Self::new(Media::Show(ItemSpec::with_ids(ids)))
    }

    pub fn episode(ids: Ids) -> Self {
        Self::new(Media::Episode(ItemSpec::with_ids(ids)))
    }

    /// Attach a rating and the time it was given
    pub fn with_rating(mut self, rating: u8, rated_at: DateTime<Utc>) -> Self {
        self.rating = Some(rating);
        self.rated_at = Some(rated_at);
        self
    }

    /// Attach a watch timestamp
    pub fn with_watched_at(mut self, watched_at: DateTime<Utc>) -> Self {
        self.watched_at = Some(watched_at);
        self
    }

    pub fn ids(&self) -> &Ids {
        &self.media.spec().ids
    }

    /// Media payload for a sync request body, carrying this item's rating
    /// and watch metadata unless the payload already has its own.
    pub fn to_body_entry(&self) -> Media {
        let mut media = self.media.clone();
        let spec = media.spec_mut();
        spec.rating = spec.rating.or(self.rating);
        spec.rated_at = spec.rated_at.or(self.rated_at);
        spec.watched_at = spec.watched_at.or(self.watched_at);
        media
    }
}

/// Wire shape of an item: a `type` tag plus one payload per media kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawItem {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    movie: Option<ItemSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    show: Option<ItemSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    episode: Option<ItemSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    listed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    watched_at: Option<DateTime<Utc>>,
}

impl RawItem {
    /// Whether the tag names one of the supported media kinds
    pub(crate) fn is_supported(&self) -> bool {
        matches!(self.kind.as_str(), "movie" | "show" | "episode")
    }
}

impl TryFrom<RawItem> for Item {
    type Error = String;

    fn try_from(raw: RawItem) -> std::result::Result<Self, Self::Error> {
        let missing = || format!("{} item without a {} payload", raw.kind, raw.kind);
        let media = match raw.kind.as_str() {
            "movie" => Media::Movie(raw.movie.ok_or_else(missing)?),
            "show" => Media::Show(raw.show.ok_or_else(missing)?),
            "episode" => Media::Episode(raw.episode.ok_or_else(missing)?),
            other => return Err(format!("unsupported item type {}", other)),
        };
        Ok(Self {
            media,
            listed_at: raw.listed_at,
            rated_at: raw.rated_at,
            rating: raw.rating,
            watched_at: raw.watched_at,
        })
    }
}

impl From<Item> for RawItem {
    fn from(item: Item) -> Self {
        let kind = item.media.type_name().to_string();
        let (movie, show, episode) = match item.media {
            Media::Movie(spec) => (Some(spec), None, None),
            Media::Show(spec) => (None, Some(spec), None),
            Media::Episode(spec) => (None, None, Some(spec)),
        };
        Self {
            kind,
            movie,
            show,
            episode,
            listed_at: item.listed_at,
            rated_at: item.rated_at,
            rating: item.rating,
            watched_at: item.watched_at,
        }
    }
}

/// Decode a collection response, skipping media kinds this client does not
/// sync (seasons, people).
pub(crate) fn decode_items(body: &[u8]) -> serde_json::Result<Vec<Item>> {
    let raw: Vec<RawItem> = serde_json::from_slice(body)?;
    let mut items = Vec::with_capacity(raw.len());
    for entry in raw {
        if !entry.is_supported() {
            tracing::debug!(kind = %entry.kind, "skipping unsupported item type");
            continue;
        }
        let item = Item::try_from(entry).map_err(<serde_json::Error as serde::de::Error>::custom)?;
        items.push(item);
    }
    Ok(items)
}
