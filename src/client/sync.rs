//! Sync operations over the watchlist, user lists, ratings and history

use super::{Mutation, MutationOutcome, TraktClient};
use crate::{
    Error, Result,
    session::{RequestSpec, engine::decode_json},
    types::{Item, ItemsBody, ListAddBody, ListIds, SyncResult, TraktList, item::decode_items},
};
use reqwest::{Response, StatusCode};
use tracing::{debug, info};

const PATH_WATCHLIST: &str = "/sync/watchlist";
const PATH_RATINGS: &str = "/sync/ratings";
const PATH_HISTORY: &str = "/sync/history";
const SUFFIX_REMOVE: &str = "/remove";
const HISTORY_LIMIT: u32 = 1000;

impl TraktClient {
    /// Items on the user's watchlist
    pub async fn watchlist_get(&self) -> Result<TraktList> {
        let items = self.items_get(PATH_WATCHLIST, "watchlist get", None).await?;
        Ok(TraktList::watchlist(items))
    }

    pub async fn watchlist_items_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        self.sync_items(Mutation::Add, "watchlist", PATH_WATCHLIST.to_string(), items, None)
            .await
    }

    pub async fn watchlist_items_remove(
        &self,
        items: &[Item],
    ) -> Result<MutationOutcome<SyncResult>> {
        let path = format!("{}{}", PATH_WATCHLIST, SUFFIX_REMOVE);
        self.sync_items(Mutation::Remove, "watchlist", path, items, None)
            .await
    }

    /// Items of the user list `list_id`
    ///
    /// A 404 yields [`Error::NotFound`] carrying `list_id`.
    pub async fn list_get(&self, list_id: &str) -> Result<TraktList> {
        let path = self.list_items_path(list_id, "")?;
        let items = self.items_get(&path, "list get", Some(list_id)).await?;
        Ok(TraktList::new(ListIds::from_slug(list_id), items))
    }

    pub async fn list_items_add(
        &self,
        list_id: &str,
        items: &[Item],
    ) -> Result<MutationOutcome<SyncResult>> {
        let path = self.list_items_path(list_id, "")?;
        self.sync_items(Mutation::Add, list_id, path, items, Some(list_id))
            .await
    }

    pub async fn list_items_remove(
        &self,
        list_id: &str,
        items: &[Item],
    ) -> Result<MutationOutcome<SyncResult>> {
        let path = self.list_items_path(list_id, SUFFIX_REMOVE)?;
        self.sync_items(Mutation::Remove, list_id, path, items, Some(list_id))
            .await
    }

    /// Metadata of every list owned by the user, without items
    pub async fn lists_metadata_get(&self) -> Result<Vec<TraktList>> {
        let path = format!("/users/{}/lists", self.username()?);
        let spec = RequestSpec::get(self.api_base_url(), path).headers(self.api_headers()?);
        let response = self.send_checked(spec, None).await?;
        decode_json(response, "lists metadata get").await
    }

    /// Create the list `list_id` titled `name`
    pub async fn list_add(&self, list_id: &str, name: &str) -> Result<MutationOutcome<TraktList>> {
        if !self.mode.permits(Mutation::Add) {
            info!(mode = %self.mode, list = list_id, "sync mode would have created trakt list");
            return Ok(MutationOutcome::Simulated);
        }

        let path = format!("/users/{}/lists", self.username()?);
        let spec = RequestSpec::post(self.api_base_url(), path)
            .headers(self.api_headers()?)
            .json(&ListAddBody::new(name, chrono::Utc::now()))?;
        let response = self.send_checked(spec, None).await?;
        let list: TraktList = decode_json(response, "list add").await?;
        info!(list = list_id, "created trakt list");
        Ok(MutationOutcome::Applied(list))
    }

    /// Delete the list `list_id`
    pub async fn list_remove(&self, list_id: &str) -> Result<MutationOutcome<()>> {
        if !self.mode.permits(Mutation::Remove) {
            info!(mode = %self.mode, list = list_id, "sync mode would have deleted trakt list");
            return Ok(MutationOutcome::Simulated);
        }

        let path = format!("/users/{}/lists/{}", self.username()?, list_id);
        let spec = RequestSpec::delete(self.api_base_url(), path).headers(self.api_headers()?);
        self.send_checked(spec, Some(list_id)).await?;
        info!(list = list_id, "deleted trakt list");
        Ok(MutationOutcome::Applied(()))
    }

    /// Every rated movie, show and episode
    pub async fn ratings_get(&self) -> Result<Vec<Item>> {
        self.items_get(PATH_RATINGS, "ratings get", None).await
    }

    pub async fn ratings_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        self.sync_items(Mutation::Add, "ratings", PATH_RATINGS.to_string(), items, None)
            .await
    }

    pub async fn ratings_remove(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        let path = format!("{}{}", PATH_RATINGS, SUFFIX_REMOVE);
        self.sync_items(Mutation::Remove, "ratings", path, items, None)
            .await
    }

    /// Watch history of one item, e.g. `("movie", "tt0068646")`
    pub async fn history_get(&self, item_type: &str, item_id: &str) -> Result<Vec<Item>> {
        let path = format!(
            "{}/{}s/{}?limit={}",
            PATH_HISTORY, item_type, item_id, HISTORY_LIMIT
        );
        self.items_get(&path, "history get", None).await
    }

    pub async fn history_add(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        self.sync_items(Mutation::Add, "history", PATH_HISTORY.to_string(), items, None)
            .await
    }

    pub async fn history_remove(&self, items: &[Item]) -> Result<MutationOutcome<SyncResult>> {
        let path = format!("{}{}", PATH_HISTORY, SUFFIX_REMOVE);
        self.sync_items(Mutation::Remove, "history", path, items, None)
            .await
    }

    fn list_items_path(&self, list_id: &str, suffix: &str) -> Result<String> {
        Ok(format!(
            "/users/{}/lists/{}/items{}",
            self.username()?,
            list_id,
            suffix
        ))
    }

    async fn items_get(
        &self,
        path: &str,
        operation: &str,
        list_id: Option<&str>,
    ) -> Result<Vec<Item>> {
        let spec = RequestSpec::get(self.api_base_url(), path).headers(self.api_headers()?);
        let response = self.send_checked(spec, list_id).await?;
        let body = response.bytes().await?;
        let items = decode_items(&body).map_err(|e| Error::decode(operation, e))?;
        debug!(operation, count = items.len(), "decoded trakt items");
        Ok(items)
    }

    /// Send a mode-gated add or remove of `items`, logging the receipt
    async fn sync_items(
        &self,
        mutation: Mutation,
        target: &str,
        path: String,
        items: &[Item],
        list_id: Option<&str>,
    ) -> Result<MutationOutcome<SyncResult>> {
        if !self.mode.permits(mutation) {
            info!(
                mode = %self.mode,
                count = items.len(),
                "sync mode would have performed {} of {} items on trakt {}",
                mutation,
                items.len(),
                target
            );
            return Ok(MutationOutcome::Simulated);
        }

        let body = ItemsBody::from(items);
        let spec = RequestSpec::post(self.api_base_url(), path)
            .headers(self.api_headers()?)
            .json(&body)?;
        let response = self.send_checked(spec, list_id).await?;
        let result: SyncResult =
            decode_json(response, &format!("{} {}", target, mutation)).await?;

        let not_found = result.not_found.counts();
        info!(
            count = body.len(),
            added = ?result.added,
            deleted = ?result.deleted,
            existing = ?result.existing,
            not_found = ?not_found,
            "trakt {} {} completed",
            target,
            mutation
        );
        Ok(MutationOutcome::Applied(result))
    }

    /// Execute `spec` and turn a 404 into an error
    ///
    /// List-scoped calls report [`Error::NotFound`] for `list_id`; other
    /// calls report a generic API error.
    async fn send_checked(&self, spec: RequestSpec, list_id: Option<&str>) -> Result<Response> {
        let method = spec.method().to_string();
        let url = spec.url();
        let response = self.engine().execute(spec).await?;
        if response.status() != StatusCode::NOT_FOUND {
            return Ok(response);
        }

        Err(match list_id {
            Some(list_id) => Error::NotFound {
                list_id: list_id.to_string(),
                method,
                url,
            },
            None => Error::Api {
                method,
                url,
                status: StatusCode::NOT_FOUND.as_u16(),
                message: "resource not found".to_string(),
            },
        })
    }
}
