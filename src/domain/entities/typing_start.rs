//! Typing indicator part, built from `TYPING_START` events.

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use crate::domain::part::{Computed, Part, PartKind};

pub struct TypingStart;

/// The unix-seconds `timestamp` rendered as RFC 3339.
fn timestamp_rfc3339(part: &Part<TypingStart>) -> Option<Value> {
    let seconds = part.attribute("timestamp")?.as_i64()?;
    let at = Utc.timestamp_opt(seconds, 0).single()?;
    Some(json!(at.to_rfc3339()))
}

fn mention(part: &Part<TypingStart>) -> Option<Value> {
    Some(json!(format!("<@{}>", part.discriminator()?)))
}

impl PartKind for TypingStart {
    const NAME: &'static str = "TypingStart";
    const DISCRIMINATOR: &'static str = "user_id";
    const FILLABLE: &'static [&'static str] = &["channel_id", "guild_id", "timestamp", "member"];
    const COMPUTED: &'static [Computed<Self>] = &[
        Computed::readonly("timestamp_rfc3339", timestamp_rfc3339),
        Computed::readonly("mention", mention),
    ];
    type Relations = ();
}
