//! Message part.

use serde_json::{json, Value};

use crate::domain::part::{key_of, Attributes, Computed, Part, PartKind};
use crate::infrastructure::http::{routes, Endpoints, Operation};

/// Prefix of message jump links.
pub const LINK_BASE_URL: &str = "https://lorhondel.valzargaming.com/channels";

/// A message in a channel or thread.
pub struct Message;

/// Jump link; private channels use `@me` in place of the guild id.
fn link(part: &Part<Message>) -> Option<Value> {
    let id = part.discriminator()?;
    let channel_id = part.key("channel_id")?;
    let guild_id = part.key("guild_id").unwrap_or_else(|| "@me".into());
    Some(json!(format!("{LINK_BASE_URL}/{guild_id}/{channel_id}/{id}")))
}

fn pick(part: &Part<Message>, keys: &[&str]) -> Attributes {
    keys.iter()
        .filter_map(|key| part.attribute(key).map(|value| (key.to_string(), value.clone())))
        .collect()
}

impl PartKind for Message {
    const NAME: &'static str = "Message";
    const FILLABLE: &'static [&'static str] = &[
        "channel_id",
        "guild_id",
        "author",
        "content",
        "timestamp",
        "edited_timestamp",
        "tts",
        "mention_everyone",
        "pinned",
        "type",
    ];
    const COMPUTED: &'static [Computed<Self>] = &[Computed::readonly("link", link)];
    type Relations = ();

    fn repository_keys() -> Vec<&'static str> {
        vec!["message_id"]
    }

    fn repository_attributes(part: &Part<Self>) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(id) = part.attribute("id") {
            attributes.insert("message_id".into(), id.clone());
        }
        attributes
    }

    fn creatable_attributes(part: &Part<Self>) -> Attributes {
        pick(part, &["content", "tts"])
    }

    fn updatable_attributes(part: &Part<Self>) -> Attributes {
        pick(part, &["content"])
    }
}

impl Message {
    /// Endpoints of a channel's message repository (`vars` carry `channel_id`).
    pub fn endpoints() -> Endpoints {
        Endpoints::new()
            .with(Operation::All, routes::CHANNEL_MESSAGES)
            .with(Operation::Get, routes::CHANNEL_MESSAGE)
            .with(Operation::Create, routes::CHANNEL_MESSAGES)
            .with(Operation::Update, routes::CHANNEL_MESSAGE)
            .with(Operation::Delete, routes::CHANNEL_MESSAGE)
    }
}

impl Part<Message> {
    /// Id of the message author, from the embedded user object.
    pub fn author_id(&self) -> Option<String> {
        self.attribute("author")?.get("id").and_then(key_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message(value: Value) -> Part<Message> {
        let Value::Object(map) = value else { unreachable!() };
        Part::assemble(map, ())
    }

    #[test]
    fn test_link_in_guild_and_private_channel() {
        let in_guild = message(json!({"id": 5, "channel_id": "2", "guild_id": "1"}));
        assert_eq!(
            in_guild.get("link").unwrap(),
            json!("https://lorhondel.valzargaming.com/channels/1/2/5")
        );

        let private = message(json!({"id": 5, "channel_id": "2"}));
        assert_eq!(
            private.get("link").unwrap(),
            json!("https://lorhondel.valzargaming.com/channels/@me/2/5")
        );

        assert!(message(json!({"id": 5})).get("link").is_err());
    }

    #[test]
    fn test_payloads_are_restricted() {
        let part = message(json!({
            "id": 5,
            "channel_id": "2",
            "content": "hello",
            "tts": false,
            "author": {"id": "9"}
        }));

        assert_eq!(
            Value::Object(part.creatable_attributes()),
            json!({"content": "hello", "tts": false})
        );
        assert_eq!(
            Value::Object(part.updatable_attributes()),
            json!({"content": "hello"})
        );
        assert_eq!(part.author_id().as_deref(), Some("9"));
    }
}
