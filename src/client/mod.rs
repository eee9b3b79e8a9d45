//! Authenticated Trakt client
//!
//! [`TraktClient::new`] signs in once and then exposes the sync operations
//! over the watchlist, user lists, ratings and history. Every mutating call
//! goes through the configured [`SyncMode`].

pub mod fetch;
pub mod mode;
pub mod sync;

pub use mode::{Mutation, MutationOutcome, SyncMode};

use crate::{
    Error, Result,
    config::Settings,
    session::{AuthFlow, RequestEngine, Session},
    types::{Item, ListIds, SyncResult, TraktList},
};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::info;

const API_VERSION: &str = "2";

/// Client bound to one signed-in session
///
/// Cloning is cheap; clones share the HTTP connection pool, the cookie jar
/// and the access token.
#[derive(Debug, Clone)]
pub struct TraktClient {
    engine: RequestEngine,
    session: Arc<Session>,
    mode: SyncMode,
    client_id: String,
    api_base_url: String,
}

impl TraktClient {
    /// Parse the operating mode, then sign in through the website
    ///
    /// An unknown mode fails before any request is sent:
    ///
    /// ```
    /// use trakt_sync_client::{Settings, TraktClient};
    ///
    /// # tokio_test::block_on(async {
    /// let mut settings = Settings::default();
    /// settings.trakt.sync_mode = "sometimes".to_string();
    /// assert!(TraktClient::new(&settings).await.is_err());
    /// # });
    /// ```
    pub async fn new(settings: &Settings) -> Result<Self> {
        let mode: SyncMode = settings.trakt.sync_mode.parse()?;
        let session = Arc::new(Session::new());
        let engine = RequestEngine::new(&settings.network, session.cookie_jar())?;

        AuthFlow::new(&engine, settings).run(&session).await?;
        info!(%mode, "trakt client ready");

        Ok(Self::assemble(settings, engine, session, mode))
    }

    /// Build a client on top of an already signed-in session
    pub fn with_session(settings: &Settings, session: Arc<Session>) -> Result<Self> {
        let mode: SyncMode = settings.trakt.sync_mode.parse()?;
        if !session.is_authenticated() {
            return Err(Error::config("session has no access token"));
        }
        let engine = RequestEngine::new(&settings.network, session.cookie_jar())?;
        Ok(Self::assemble(settings, engine, session, mode))
    }

    fn assemble(
        settings: &Settings,
        engine: RequestEngine,
        session: Arc<Session>,
        mode: SyncMode,
    ) -> Self {
        Self {
            engine,
            session,
            mode,
            client_id: settings.trakt.client_id.clone(),
            api_base_url: settings.network.api_base_url.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub(crate) fn engine(&self) -> &RequestEngine {
        &self.engine
    }

    pub(crate) fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Handle of the signed-in user
    pub fn username(&self) -> Result<&str> {
        self.session
            .username()
            .ok_or_else(|| Error::config("session has no username"))
    }

    /// Headers sent with every API call
    pub fn api_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("trakt-api-key"),
            HeaderValue::from_str(&self.client_id)
                .map_err(|e| Error::config(format!("invalid client id header: {}", e)))?,
        );
        headers.insert(
            HeaderName::from_static("trakt-api-version"),
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.session.access_token() {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| Error::config(format!("invalid access token header: {}", e)))?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }
        Ok(headers)
    }
}

/// Operations a sync run needs from the service
///
/// Implemented by [`TraktClient`]; reconciliation code can substitute a
/// fake.
#[async_trait]
pub trait TraktApi: Send + Sync {
    async fn watchlist_get(&self) -> Result<TraktList>;
    async fn watchlist_items_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>>;
    async fn watchlist_items_remove(&self, items: &[Item])
    -> Result<MutationOutcome<SyncResult>>;

    async fn list_get(&self, list_id: &str) -> Result<TraktList>;
    async fn list_items_add(
        &self,
        list_id: &str,
        items: &[Item],
    ) -> Result<MutationOutcome<SyncResult>>;
    async fn list_items_remove(
        &self,
        list_id: &str,
        items: &[Item],
    ) -> Result<MutationOutcome<SyncResult>>;
    async fn lists_get(&self, ids: &[ListIds]) -> Result<Vec<TraktList>>;
    async fn lists_metadata_get(&self) -> Result<Vec<TraktList>>;
    async fn list_add(&self, list_id: &str, name: &str) -> Result<MutationOutcome<TraktList>>;
    async fn list_remove(&self, list_id: &str) -> Result<MutationOutcome<()>>;

    async fn ratings_get(&self) -> Result<Vec<Item>>;
    async fn ratings_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>>;
    async fn ratings_remove(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>>;

    async fn history_get(&self, item_type: &str, item_id: &str) -> Result<Vec<Item>>;
    async fn history_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>>;
    async fn history_remove(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>>;
}

#[async_trait]
impl TraktApi for TraktClient {
    async fn watchlist_get(&self) -> Result<TraktList> {
        TraktClient::watchlist_get(self).await
    }

    async fn watchlist_items_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        TraktClient::watchlist_items_add(self, items).await
    }

    async fn watchlist_items_remove(
        &self,
        items: &[Item],
    ) -> Result<MutationOutcome<SyncResult>> {
        TraktClient::watchlist_items_remove(self, items).await
    }

    async fn list_get(&self, list_id: &str) -> Result<TraktList> {
        TraktClient::list_get(self, list_id).await
    }

    async fn list_items_add(
        &self,
        list_id: &str,
        items: &[Item],
    ) -> Result<MutationOutcome<SyncResult>> {
        TraktClient::list_items_add(self, list_id, items).await
    }

    async fn list_items_remove(
        &self,
        list_id: &str,
        items: &[Item],
    ) -> Result<MutationOutcome<SyncResult>> {
        TraktClient::list_items_remove(self, list_id, items).await
    }

    async fn lists_get(&self, ids: &[ListIds]) -> Result<Vec<TraktList>> {
        TraktClient::lists_get(self, ids).await
    }

    async fn lists_metadata_get(&self) -> Result<Vec<TraktList>> {
        TraktClient::lists_metadata_get(self).await
    }

    async fn list_add(&self, list_id: &str, name: &str) -> Result<MutationOutcome<TraktList>> {
        TraktClient::list_add(self, list_id, name).await
    }

    async fn list_remove(&self, list_id: &str) -> Result<MutationOutcome<()>> {
        TraktClient::list_remove(self, list_id).await
    }

    async fn ratings_get(&self) -> Result<Vec<Item>> {
        TraktClient::ratings_get(self).await
    }

    async fn ratings_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        TraktClient::ratings_add(self, items).await
    }

    async fn ratings_remove(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        TraktClient::ratings_remove(self, items).await
    }

    async fn history_get(&self, item_type: &str, item_id: &str) -> Result<Vec<Item>> {
        TraktClient::history_get(self, item_type, item_id).await
    }

    async fn history_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        TraktClient::history_add(self, items).await
    }

    async fn history_remove(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        TraktClient::history_remove(self, items).await
    }
}
