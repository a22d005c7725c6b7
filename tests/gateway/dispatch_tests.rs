//! Event dispatch, completion signals and fan-out.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::common::{client, FakeHttp};
use part_cache::application::Client;
use part_cache::config::EventSettings;
use part_cache::infrastructure::metrics;
use part_cache::presentation::gateway::{Deferred, Event, EventDispatcher, EventType, Resolved};

fn dispatcher() -> EventDispatcher {
    EventDispatcher::new(Arc::new(client(FakeHttp::new())), &EventSettings::default())
}

/// Resolves every typing event with an empty batch.
struct Silent;

#[async_trait]
impl Event for Silent {
    fn event_type(&self) -> EventType {
        EventType::TypingStart
    }

    async fn handle(&self, _client: &Client, _data: Value, deferred: Deferred) {
        deferred.resolve(Resolved::Parts(Vec::new()));
    }
}

/// Resolves from a spawned task after the handler has returned.
struct Later;

#[async_trait]
impl Event for Later {
    fn event_type(&self) -> EventType {
        EventType::GuildDelete
    }

    async fn handle(&self, _client: &Client, data: Value, deferred: Deferred) {
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            deferred.resolve(Resolved::Raw(json!({"late": data})));
        });
    }
}

#[tokio::test]
async fn test_registered_handler_replaces_default() {
    let dispatcher = dispatcher();
    dispatcher.register(Arc::new(Silent));

    let resolved = dispatcher.dispatch("TYPING_START", json!({"user_id": "1"})).await;
    assert_eq!(resolved.parts().map(<[Resolved]>::len), Some(0));
}

#[tokio::test]
async fn test_completion_waits_for_deferred_resolution() {
    let dispatcher = dispatcher();
    dispatcher.register(Arc::new(Later));

    let resolved = dispatcher.dispatch("GUILD_DELETE", json!({"id": "1"})).await;
    assert_eq!(resolved.raw(), Some(&json!({"late": {"id": "1"}})));
}

#[tokio::test]
async fn test_every_dispatch_is_broadcast() {
    let dispatcher = dispatcher();
    let mut first = dispatcher.subscribe();
    let mut second = dispatcher.subscribe();

    dispatcher.dispatch("MESSAGE_DELETE", json!({"id": "5", "channel_id": "2"})).await;
    dispatcher.dispatch("READY", json!({})).await;

    for receiver in [&mut first, &mut second] {
        let delete = receiver.recv().await.unwrap();
        assert_eq!(delete.event, "MESSAGE_DELETE");
        assert!(delete.resolved.is_raw());
        assert_eq!(receiver.recv().await.unwrap().event, "READY");
    }
}

#[tokio::test]
async fn test_dispatch_without_subscribers_still_resolves() {
    let resolved = dispatcher().dispatch("CHANNEL_DELETE", json!({"id": "3"})).await;
    assert_eq!(resolved.outcome(), "raw");
}

#[tokio::test]
async fn test_events_are_counted_by_outcome() {
    let dispatcher = dispatcher();
    dispatcher.dispatch("TYPING_START", json!({"user_id": "4", "channel_id": "2"})).await;

    let exposition = metrics::gather_metrics();
    assert!(exposition.contains("part_cache_events_total"));
    assert!(exposition.contains(r#"event="TYPING_START",outcome="part""#));
}

#[tokio::test]
async fn test_unknown_tags_share_one_metric_label() {
    let dispatcher = dispatcher();
    dispatcher.dispatch("VOICE_SERVER_UPDATE", json!({})).await;
    dispatcher.dispatch("SOMETHING_NEW_1234", json!({})).await;

    let exposition = metrics::gather_metrics();
    assert!(exposition.contains(r#"event="unknown",outcome="raw""#));
    assert!(!exposition.contains("VOICE_SERVER_UPDATE"));
    assert!(!exposition.contains("SOMETHING_NEW_1234"));
}
