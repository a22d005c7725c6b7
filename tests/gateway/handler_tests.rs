//! Gateway handlers mutating the cache graph.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{client, FakeHttp};
use part_cache::application::Client;
use part_cache::config::EventSettings;
use part_cache::domain::{Channel, Guild, Part};
use part_cache::presentation::gateway::{AnyPart, EventDispatcher, Resolved};

fn dispatcher() -> EventDispatcher {
    EventDispatcher::new(Arc::new(client(FakeHttp::new())), &EventSettings::default())
}

/// Cache guild 1 with text channel 2.
fn seed_guild(client: &Client) -> Part<Channel> {
    let guild: Part<Guild> = client
        .factory()
        .create_value(json!({"id": "1", "name": "home"}), true)
        .unwrap();
    let channel = guild
        .channels()
        .hydrate(json!({"id": "2", "type": 0}).as_object().cloned().unwrap())
        .unwrap();
    guild.channels().push(channel.clone()).unwrap();
    client.guilds().push(guild).unwrap();
    channel
}

fn message_id(resolved: &Resolved) -> Option<String> {
    match resolved.part()? {
        AnyPart::Message(message) => message.discriminator(),
        _ => None,
    }
}

#[tokio::test]
async fn test_delete_of_uncached_message_resolves_raw_payload() {
    let dispatcher = dispatcher();
    let payload = json!({"id": "5", "channel_id": "2", "guild_id": "1"});

    let resolved = dispatcher.dispatch("MESSAGE_DELETE", payload.clone()).await;

    assert_eq!(resolved.raw(), Some(&payload));
}

#[tokio::test]
async fn test_message_lifecycle_through_events() {
    let dispatcher = dispatcher();
    let channel = seed_guild(dispatcher.client());

    let created = dispatcher
        .dispatch(
            "MESSAGE_CREATE",
            json!({"id": "5", "channel_id": "2", "guild_id": "1", "content": "hello"}),
        )
        .await;
    assert_eq!(message_id(&created).as_deref(), Some("5"));
    assert!(channel.messages().has("5"));

    let updated = dispatcher
        .dispatch(
            "MESSAGE_UPDATE",
            json!({"id": "5", "channel_id": "2", "guild_id": "1", "content": "edited"}),
        )
        .await;
    assert_eq!(updated.to_value()["content"], json!("edited"));
    assert_eq!(
        channel.messages().get("5").unwrap().attribute("content"),
        Some(&json!("edited"))
    );

    let deleted = dispatcher
        .dispatch("MESSAGE_DELETE", json!({"id": "5", "channel_id": "2", "guild_id": "1"}))
        .await;
    assert!(deleted.part().unwrap().deleted());
    assert!(!channel.messages().has("5"));
}

#[tokio::test]
async fn test_message_create_in_unknown_channel_is_not_cached() {
    let dispatcher = dispatcher();

    let resolved = dispatcher
        .dispatch("MESSAGE_CREATE", json!({"id": "8", "channel_id": "404", "content": "hi"}))
        .await;

    assert_eq!(message_id(&resolved).as_deref(), Some("8"));
    assert!(dispatcher.client().channel(None, "404").is_none());
}

#[tokio::test]
async fn test_bulk_delete_resolves_per_id_in_order() {
    let dispatcher = dispatcher();
    let channel = seed_guild(dispatcher.client());
    for id in ["10", "11"] {
        let message = channel
            .messages()
            .hydrate(json!({"id": id, "content": "x"}).as_object().cloned().unwrap())
            .unwrap();
        channel.messages().push(message).unwrap();
    }

    let resolved = dispatcher
        .dispatch(
            "MESSAGE_DELETE_BULK",
            json!({"ids": ["10", "99", "11"], "channel_id": "2", "guild_id": "1"}),
        )
        .await;

    let results = resolved.parts().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(message_id(&results[0]).as_deref(), Some("10"));
    assert_eq!(
        results[1].raw(),
        Some(&json!({"id": "99", "channel_id": "2", "guild_id": "1"}))
    );
    assert_eq!(message_id(&results[2]).as_deref(), Some("11"));
    assert!(channel.messages().is_empty());
}

#[tokio::test]
async fn test_thread_create_attaches_members_and_dedupes() {
    let dispatcher = dispatcher();
    let channel = seed_guild(dispatcher.client());
    let payload = json!({
        "id": "30",
        "guild_id": "1",
        "parent_id": "2",
        "name": "planning",
        "members": [{"user_id": "100", "id": "30"}],
        "member": {"user_id": "101", "id": "30"}
    });

    let first = dispatcher.dispatch("THREAD_CREATE", payload.clone()).await;
    let thread = dispatcher.client().thread(Some("1"), "2", "30").unwrap();
    assert_eq!(thread.members().keys(), vec!["100", "101"]);
    assert_eq!(first.part().unwrap().kind(), "Thread");

    // a second create for the same thread returns the cached part
    dispatcher
        .dispatch("THREAD_CREATE", json!({"id": "30", "guild_id": "1", "parent_id": "2", "name": "renamed"}))
        .await;
    let cached = channel.threads().get("30").unwrap();
    assert_eq!(cached.attribute("name"), Some(&json!("planning")));
    assert_eq!(channel.threads().len(), 1);
}

#[tokio::test]
async fn test_guild_create_embeds_channels_and_threads() {
    let dispatcher = dispatcher();

    let resolved = dispatcher
        .dispatch(
            "GUILD_CREATE",
            json!({
                "id": "1",
                "name": "home",
                "channels": [{"id": "2", "type": 0}, {"id": "3", "type": 2}],
                "threads": [{"id": "30", "parent_id": "2", "guild_id": "1"}]
            }),
        )
        .await;

    assert_eq!(resolved.part().unwrap().discriminator().as_deref(), Some("1"));
    let client = dispatcher.client();
    let guild = client.guild("1").unwrap();
    assert_eq!(guild.channels().keys(), vec!["2", "3"]);
    assert_eq!(
        client.channel(Some("1"), "2").unwrap().attribute("guild_id"),
        Some(&json!("1"))
    );
    assert!(client.thread(Some("1"), "2", "30").is_some());
    // embedded lists are not stored as attributes
    assert!(guild.attribute("channels").is_none());
}

#[tokio::test]
async fn test_guild_delete_unavailable_keeps_guild() {
    let dispatcher = dispatcher();
    seed_guild(dispatcher.client());

    dispatcher
        .dispatch("GUILD_DELETE", json!({"id": "1", "unavailable": true}))
        .await;
    let guild = dispatcher.client().guild("1").unwrap();
    assert_eq!(guild.attribute("unavailable"), Some(&json!(true)));

    let removed = dispatcher.dispatch("GUILD_DELETE", json!({"id": "1"})).await;
    assert!(removed.part().unwrap().deleted());
    assert!(dispatcher.client().guild("1").is_none());
}

#[tokio::test]
async fn test_private_channel_create_and_delete() {
    let dispatcher = dispatcher();

    let created = dispatcher
        .dispatch("CHANNEL_CREATE", json!({"id": "50", "type": 1, "recipients": []}))
        .await;
    match created.part() {
        Some(AnyPart::Channel(channel)) => assert!(channel.channel_type().is_private()),
        other => panic!("expected a channel, got {other:?}"),
    }
    assert!(dispatcher.client().private_channels().has("50"));

    let deleted = dispatcher.dispatch("CHANNEL_DELETE", json!({"id": "50", "type": 1})).await;
    assert!(deleted.part().unwrap().deleted());
    assert!(dispatcher.client().private_channels().is_empty());
}

#[tokio::test]
async fn test_typing_start_is_never_cached() {
    let dispatcher = dispatcher();

    let resolved = dispatcher
        .dispatch(
            "TYPING_START",
            json!({"user_id": "9", "channel_id": "2", "timestamp": 1_600_000_000}),
        )
        .await;

    match resolved.part() {
        Some(AnyPart::TypingStart(typing)) => {
            assert_eq!(typing.get("mention").unwrap(), json!("<@9>"));
        }
        other => panic!("expected a typing part, got {other:?}"),
    }
}
