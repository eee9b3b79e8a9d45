//! Concurrent fetch of user lists

mod common;

use common::{settings, sign_in_server};
use serde_json::json;
use std::collections::BTreeSet;
use std::time::Duration;
use trakt_sync_client::{Error, ListIds, TraktClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_list(server: &MockServer, slug: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/users/sean/lists/{}/items", slug)))
        .respond_with(template)
        .mount(server)
        .await;
}

fn list_body(imdb: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([
        {"type": "movie", "listed_at": "2024-01-01T00:00:00.000Z",
         "movie": {"ids": {"imdb": imdb}}},
        {"type": "person", "person": {"name": "Al Pacino", "ids": {"trakt": 1}}}
    ]))
}

#[tokio::test]
async fn test_deleted_list_is_skipped() {
    let server = sign_in_server().await;
    mount_list(&server, "a", list_body("tt1")).await;
    mount_list(&server, "b", ResponseTemplate::new(404)).await;
    mount_list(&server, "c", list_body("tt3")).await;
    mount_list(&server, "d", list_body("tt4")).await;
    let client = common::client(&server, "full").await;

    let ids: Vec<ListIds> = ["a", "b", "c", "d"].into_iter().map(ListIds::from_slug).collect();
    let lists = client.lists_get(&ids).await.unwrap();

    assert_eq!(lists.len(), 3);
    let slugs: BTreeSet<&str> = lists.iter().map(|list| list.slug()).collect();
    assert_eq!(slugs, BTreeSet::from(["a", "c", "d"]));
    for list in &lists {
        assert_eq!(list.items.len(), 1, "person entries are skipped");
    }
}

#[tokio::test]
async fn test_every_list_fetched_once() {
    let server = sign_in_server().await;
    for slug in ["one", "two", "three"] {
        Mock::given(method("GET"))
            .and(path(format!("/users/sean/lists/{}/items", slug)))
            .respond_with(list_body(slug))
            .expect(1)
            .mount(&server)
            .await;
    }
    let client = common::client(&server, "dry-run").await;

    let ids: Vec<ListIds> = ["one", "two", "three"]
        .into_iter()
        .map(ListIds::from_slug)
        .collect();
    let lists = client.lists_get(&ids).await.unwrap();
    assert_eq!(lists.len(), 3);
}

#[tokio::test]
async fn test_transport_error_returns_no_lists() {
    let server = sign_in_server().await;
    mount_list(&server, "fast", list_body("tt1")).await;
    mount_list(
        &server,
        "stalled",
        list_body("tt2").set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut settings = settings(&server.uri(), "full");
    settings.network.timeout_secs = 1;
    let client = TraktClient::new(&settings).await.unwrap();

    let ids = [ListIds::from_slug("fast"), ListIds::from_slug("stalled")];
    let err = client.lists_get(&ids).await.unwrap_err();
    assert!(matches!(err, Error::Network(ref e) if e.is_timeout()), "got {:?}", err);
}

#[tokio::test]
async fn test_account_limit_is_not_absorbed() {
    let server = sign_in_server().await;
    mount_list(&server, "a", list_body("tt1")).await;
    mount_list(&server, "b", ResponseTemplate::new(420)).await;
    let client = common::client(&server, "full").await;

    let ids = [ListIds::from_slug("a"), ListIds::from_slug("b")];
    let err = client.lists_get(&ids).await.unwrap_err();
    assert!(matches!(err, Error::AccountLimit { .. }));
}
