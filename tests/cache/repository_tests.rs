//! Repository CRUD against a scripted remote.

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{client, object, FakeHttp, Recorded};
use part_cache::infrastructure::http::HttpMethod;
use part_cache::shared::CacheError;

#[tokio::test]
async fn test_create_save_then_fetch_from_cache() {
    let http = FakeHttp::new();
    http.respond(
        HttpMethod::Post,
        "players",
        json!({"id": 7, "health": 0, "attack": 1}),
    );
    let client = client(http.clone());

    let mut player = client
        .players()
        .create(object(json!({"health": 0, "attack": 1})))
        .unwrap();
    assert!(!player.created());

    client.players().save(&mut player).await.unwrap();
    assert!(player.created());

    let fetched = client.players().fetch(7, false).await.unwrap();
    assert_eq!(fetched, player);
    assert_eq!(
        http.requests(),
        vec![Recorded {
            method: HttpMethod::Post,
            path: "players".into(),
            body: Some(json!({"health": 0, "attack": 1})),
        }]
    );
}

#[tokio::test]
async fn test_fetch_is_served_from_cache_after_first_request() {
    let http = FakeHttp::new();
    http.respond(HttpMethod::Get, "players/42", json!({"id": "42", "health": 10}));
    let client = client(http.clone());

    for _ in 0..5 {
        client.players().fetch("42", false).await.unwrap();
    }
    assert_eq!(http.count(HttpMethod::Get, "players/42"), 1);

    client.players().fetch("42", true).await.unwrap();
    assert_eq!(http.count(HttpMethod::Get, "players/42"), 2);
}

#[tokio::test]
async fn test_update_uses_patch_with_updatable_attributes() {
    let http = FakeHttp::new();
    http.respond(HttpMethod::Get, "parties/3", json!({"id": 3, "name": "old", "member_ids": [1]}));
    http.respond(HttpMethod::Patch, "parties/3", json!({"id": 3, "name": "new", "member_ids": [1]}));
    let client = client(http.clone());

    let mut party = client.parties().fetch(3, false).await.unwrap();
    party.set("name", "new");
    client.parties().save(&mut party).await.unwrap();

    let patch = http.requests().pop().unwrap();
    assert_eq!(patch.method, HttpMethod::Patch);
    assert_eq!(patch.body, Some(json!({"name": "new", "member_ids": [1]})));
    assert_eq!(
        client.parties().get("3").unwrap().attribute("name"),
        Some(&json!("new"))
    );
    assert_eq!(party.get("size").unwrap(), json!(1));
}

#[tokio::test]
async fn test_delete_of_transient_part_issues_no_request() {
    let http = FakeHttp::new();
    let client = client(http.clone());

    let mut player = client.players().create(object(json!({"health": 3}))).unwrap();
    let result = client.players().delete(&mut player).await;

    assert!(matches!(result, Err(CacheError::PreconditionFailed(_))));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_deleted_entry_stays_flagged_until_pruned() {
    let http = FakeHttp::new();
    http.respond(HttpMethod::Get, "players/5", json!({"id": 5}));
    http.respond(HttpMethod::Delete, "players/5", json!(null));
    let client = client(http.clone());

    let mut player = client.players().fetch(5, false).await.unwrap();
    client.players().delete(&mut player).await.unwrap();

    assert!(player.deleted());
    assert!(client.players().get("5").unwrap().is_stale());

    // a stale entry is not served from the cache
    client.players().fetch(5, false).await.unwrap();
    assert_eq!(http.count(HttpMethod::Get, "players/5"), 2);
    assert!(client.players().get("5").unwrap().created());
    assert_eq!(client.players().prune(), 0);
}

#[tokio::test]
async fn test_remote_failure_reaches_caller() {
    let http = FakeHttp::new();
    http.fail(HttpMethod::Get, "players", 503, "maintenance");
    let client = client(http.clone());

    let err = client.players().freshen().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_client_freshen_named_repositories() {
    let http = FakeHttp::new();
    http.respond(HttpMethod::Get, "players", json!([{"id": 1}, {"id": 2}, {"id": 3}]));
    http.respond(HttpMethod::Get, "parties", json!([{"id": 10, "member_ids": [1, 2]}]));
    let client = client(http.clone());

    let counts = client
        .freshen(&["players".to_string(), "parties".to_string()])
        .await
        .unwrap();

    assert_eq!(counts, vec![("players".to_string(), 3), ("parties".to_string(), 1)]);
    assert_eq!(client.players().keys(), vec!["1", "2", "3"]);
    assert!(client.parties().first().unwrap().created());
}
