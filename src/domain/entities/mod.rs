//! # Domain Entities
//!
//! The part kinds mirrored from the remote API.
//!
//! ## Top-level kinds
//!
//! - **Player**: a game character, keyed by `id`, bound as `player_id`
//! - **Party**: a group of players
//! - **Application**: the bot's own OAuth2 application
//!
//! ## Nested kinds
//!
//! ```text
//! Guild ──channels──> Channel ──messages──> Message
//!                        └────threads───> Thread ──members──> ThreadMember
//! ```
//!
//! Parents own their child repositories; children carry parent ids
//! (`guild_id`, `channel_id`, `parent_id`) for navigation only.
//!
//! ## Event-only kinds
//!
//! - **TypingStart**: hydrated from gateway events, never cached

mod application;
mod channel;
mod guild;
mod message;
mod party;
mod player;
mod thread;
mod thread_member;
mod typing_start;

pub use application::{Application, INVITE_BASE_URL};
pub use channel::{Channel, ChannelRelations, ChannelType};
pub use guild::{Guild, GuildRelations};
pub use message::{Message, LINK_BASE_URL};
pub use party::Party;
pub use player::Player;
pub use thread::{Thread, ThreadRelations};
pub use thread_member::ThreadMember;
pub use typing_start::TypingStart;

use serde_json::Value;

use super::part::Attributes;

/// Ambient vars for a child repository: the parent's `id` under `key`.
///
/// The key is always present (null for a parent without an id yet) so the
/// child's endpoint templates validate; binding fails until the id is known.
pub(crate) fn scope(key: &str, parent: &Attributes) -> Attributes {
    let mut vars = Attributes::new();
    vars.insert(
        key.to_string(),
        parent.get("id").cloned().unwrap_or(Value::Null),
    );
    vars
}

