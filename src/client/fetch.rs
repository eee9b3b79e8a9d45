//! Concurrent fetch of several user lists

use super::TraktClient;
use crate::{Result, types::{ListIds, TraktList}};
use tokio::task::JoinSet;
use tracing::debug;

impl TraktClient {
    /// Fetch every list in `ids` concurrently, one task per list
    ///
    /// Lists that no longer exist are skipped. The first other error is
    /// returned and the remaining tasks are aborted. Returned lists carry
    /// the ids passed in, in completion order.
    pub async fn lists_get(&self, ids: &[ListIds]) -> Result<Vec<TraktList>> {
        let mut tasks = JoinSet::new();
        for list_ids in ids {
            let client = self.clone();
            let list_ids = list_ids.clone();
            tasks.spawn(async move {
                let result = client.list_get(&list_ids.identifier()).await;
                (list_ids, result)
            });
        }

        let mut lists = Vec::with_capacity(ids.len());
        while let Some(joined) = tasks.join_next().await {
            let (list_ids, result) = joined?;
            match result {
                Ok(mut list) => {
                    list.ids = list_ids;
                    lists.push(list);
                }
                Err(e) if e.is_not_found() => {
                    debug!(list = %list_ids.identifier(), "skipping trakt list that no longer exists: {}", e);
                }
                // Dropping `tasks` aborts the lists still in flight.
                Err(e) => return Err(e),
            }
        }

        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::client::tests::client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_list(server: &MockServer, slug: &str, status: u16) {
        let template = if status == 200 {
            ResponseTemplate::new(200).set_body_json(json!([
                {"type": "movie", "movie": {"ids": {"imdb": format!("tt-{}", slug)}}}
            ]))
        } else {
            ResponseTemplate::new(status)
        };
        Mock::given(method("GET"))
            .and(path(format!("/users/sean/lists/{}/items", slug)))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let server = MockServer::start().await;
        let lists = client(&server.uri(), "full").lists_get(&[]).await.unwrap();
        assert!(lists.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keeps_caller_ids() {
        let server = MockServer::start().await;
        mount_list(&server, "favourites", 200).await;

        let ids = ListIds {
            trakt: Some(42),
            slug: "favourites".to_string(),
        };
        let lists = client(&server.uri(), "full")
            .lists_get(std::slice::from_ref(&ids))
            .await
            .unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].ids, ids);
        assert!(!lists[0].is_watchlist);
        assert_eq!(lists[0].items.len(), 1);
    }

    #[tokio::test]
    async fn test_server_error_wins() {
        let server = MockServer::start().await;
        mount_list(&server, "a", 200).await;
        mount_list(&server, "b", 500).await;

        let ids = [ListIds::from_slug("a"), ListIds::from_slug("b")];
        let err = client(&server.uri(), "full").lists_get(&ids).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }));
    }
}
