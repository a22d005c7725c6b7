//! Nested repositories: guild → channel → message.

use serde_json::json;

use crate::common::{client, object, FakeHttp};
use part_cache::infrastructure::http::HttpMethod;
use part_cache::shared::CacheError;

#[tokio::test]
async fn test_nested_repositories_bind_parent_ids() {
    let http = FakeHttp::new();
    http.respond(HttpMethod::Get, "users/@me/guilds", json!([{"id": "1", "name": "home"}]));
    http.respond(
        HttpMethod::Get,
        "guilds/1/channels",
        json!([{"id": "2", "name": "general", "type": 0}]),
    );
    http.respond(
        HttpMethod::Get,
        "channels/2/messages/5",
        json!({"id": "5", "content": "hello"}),
    );
    let client = client(http.clone());

    client.guilds().freshen().await.unwrap();
    let guild = client.guild("1").unwrap();
    guild.channels().freshen().await.unwrap();

    let channel = client.channel(Some("1"), "2").unwrap();
    assert_eq!(channel.attribute("guild_id"), Some(&json!("1")));

    let message = channel.messages().fetch("5", false).await.unwrap();
    assert_eq!(message.attribute("channel_id"), Some(&json!("2")));
    assert_eq!(
        message.get("link").unwrap(),
        json!("https://lorhondel.valzargaming.com/channels/@me/2/5")
    );

    // the fetched message is visible through every handle on the channel
    let again = client.channel(Some("1"), "2").unwrap();
    assert!(again.messages().has("5"));
}

#[tokio::test]
async fn test_send_message_into_channel() {
    let http = FakeHttp::new();
    http.respond(
        HttpMethod::Post,
        "channels/2/messages",
        json!({"id": "9", "channel_id": "2", "content": "hi", "author": {"id": "77"}}),
    );
    let client = client(http.clone());
    let channel = client
        .factory()
        .create_value::<part_cache::domain::Channel>(json!({"id": "2", "type": 1}), true)
        .unwrap();
    client.private_channels().push(channel.clone()).unwrap();

    let mut message = channel
        .messages()
        .create(object(json!({"content": "hi"})))
        .unwrap();
    channel.messages().save(&mut message).await.unwrap();

    let sent = http.requests().pop().unwrap();
    assert_eq!(sent.body, Some(json!({"content": "hi"})));
    assert_eq!(message.author_id().as_deref(), Some("77"));
    assert!(client.channel(None, "2").unwrap().messages().has("9"));
}

#[tokio::test]
async fn test_unknown_parent_cannot_bind() {
    let http = FakeHttp::new();
    let client = client(http.clone());

    // a transient guild has no id to scope its channels with
    let guild = client.guilds().create(object(json!({"name": "draft"}))).unwrap();
    let result = guild.channels().freshen().await;

    assert!(matches!(result, Err(CacheError::Configuration(_))));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_guild_repository_has_no_create_endpoint() {
    let client = client(FakeHttp::new());
    let mut guild = client.guilds().create(object(json!({"name": "draft"}))).unwrap();

    let result = client.guilds().save(&mut guild).await;
    assert!(matches!(result, Err(CacheError::UnsupportedOperation { .. })));
}
