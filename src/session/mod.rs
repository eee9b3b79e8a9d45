//! Browser-emulated session for the Trakt client
//!
//! This module holds the state shared by every request of one client: the
//! cookie jar filled in by the sign-in pages and the bearer token obtained
//! at the end of the device-code exchange. It also provides the resilient
//! request engine, the form scraper and the sign-in sequence itself.

pub mod auth;
pub mod engine;
pub mod scrape;

pub use auth::{AuthFlow, AuthStep, AuthenticityToken};
pub use engine::{RequestEngine, RequestSpec};
pub use scrape::scrape_attribute;

use reqwest::cookie::Jar;
use std::sync::{Arc, OnceLock};

/// Cookie store and credentials of one authenticated session
///
/// Cookies are appended to by any browser-emulating response. The access
/// token and username are written once, at the end of hydration, and are
/// read-only afterwards.
#[derive(Debug, Default)]
pub struct Session {
    cookies: Arc<Jar>,
    access_token: OnceLock<String>,
    username: OnceLock<String>,
}

impl Session {
    /// Create an empty, unauthenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookie jar to install on the HTTP client
    pub fn cookie_jar(&self) -> Arc<Jar> {
        Arc::clone(&self.cookies)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.get().map(String::as_str)
    }

    /// Handle of the signed-in user, scraped during authorization
    pub fn username(&self) -> Option<&str> {
        self.username.get().map(String::as_str)
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.get().is_some()
    }

    pub(crate) fn set_access_token(&self, token: impl Into<String>) -> crate::Result<()> {
        self.access_token
            .set(token.into())
            .map_err(|_| crate::Error::config("session access token already set"))
    }

    pub(crate) fn set_username(&self, username: impl Into<String>) -> crate::Result<()> {
        self.username
            .set(username.into())
            .map_err(|_| crate::Error::config("session username already set"))
    }
}
