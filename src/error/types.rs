//! Error type definitions
//!
//! Defines the error taxonomy shared by the request engine, the sign-in
//! sequence and the sync operations.

use thiserror::Error;

/// Main error type for the Trakt client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP transport errors, never retried
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Expected DOM node or attribute absent from a scraped page
    #[error("Trakt scrape error at {step}: no `{attribute}` on node matching `{selector}`")]
    Scrape {
        step: String,
        selector: String,
        attribute: String,
    },

    /// Avatar link did not have the `/users/<handle>` shape
    #[error("Failure scraping trakt username from href {href:?}")]
    Username { href: String },

    /// A sign-in step failed; wraps the underlying cause
    #[error("Hydration failed at {step}: {source}")]
    Hydration {
        step: String,
        #[source]
        source: Box<Error>,
    },

    /// Vendor status 420: the account-level item limit is exhausted
    #[error("Trakt account limit exceeded for {method} {url}, see https://github.com/trakt/api-help/discussions/350")]
    AccountLimit { method: String, url: String },

    /// Rate limiting persisted through every permitted attempt
    #[error("Reached max retry attempts ({attempts}) for {method} {url}")]
    MaxRetries {
        method: String,
        url: String,
        attempts: usize,
    },

    /// `Retry-After` header missing or not an integer number of seconds
    #[error("Invalid Retry-After header value: {value:?}")]
    RetryAfter { value: String },

    /// Requested list does not exist (HTTP 404)
    #[error("List with id {list_id} could not be found ({method} {url})")]
    NotFound {
        list_id: String,
        method: String,
        url: String,
    },

    /// Any other terminal HTTP status
    #[error("API error: {method} {url} returned {status}: {message}")]
    Api {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// Malformed JSON response body
    #[error("Failure decoding {operation} response: {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// A spawned fetch task panicked or was cancelled
    #[error("Task error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a scrape error naming the step and selector that failed
    pub fn scrape(
        step: impl Into<String>,
        selector: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self::Scrape {
            step: step.into(),
            selector: selector.into(),
            attribute: attribute.into(),
        }
    }

    /// Wrap an error raised inside a sign-in step
    pub fn hydration(step: impl Into<String>, source: Error) -> Self {
        Self::Hydration {
            step: step.into(),
            source: Box::new(source),
        }
    }

    /// Create a decode error for the named operation
    pub fn decode(operation: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            operation: operation.into(),
            source,
        }
    }

    /// Whether this error is the single-list not-found outcome
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Hydration { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::AccountLimit { .. } => Some(420),
            Self::MaxRetries { .. } => Some(429),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
