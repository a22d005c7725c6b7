//! Player part.

use serde_json::{json, Value};

use crate::domain::part::{Attributes, Computed, Part, PartKind};
use crate::domain::value_objects::Snowflake;
use crate::infrastructure::http::{routes, Endpoints, Operation};

/// A game character owned by a user.
pub struct Player;

fn mention(part: &Part<Player>) -> Option<Value> {
    Some(json!(format!("<@{}>", part.discriminator()?)))
}

/// Seconds since the Unix epoch, taken from the snowflake id.
fn created_timestamp(part: &Part<Player>) -> Option<Value> {
    let snowflake = Snowflake::from_value(part.attribute("id")?)?;
    Some(json!(snowflake.timestamp() as f64 / 1000.0))
}

impl PartKind for Player {
    const NAME: &'static str = "Player";
    const FILLABLE: &'static [&'static str] = &[
        "health",
        "attack",
        "defense",
        "speed",
        "user_id",
        "species",
        "skillpoints",
        "party_id",
    ];
    const COMPUTED: &'static [Computed<Self>] = &[
        Computed::readonly("mention", mention),
        Computed::readonly("created_timestamp", created_timestamp),
    ];
    type Relations = ();

    fn repository_keys() -> Vec<&'static str> {
        vec!["player_id"]
    }

    fn repository_attributes(part: &Part<Self>) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(id) = part.attribute("id") {
            attributes.insert("player_id".into(), id.clone());
        }
        attributes
    }
}

impl Player {
    pub fn endpoints() -> Endpoints {
        Endpoints::new()
            .with(Operation::All, routes::PLAYERS)
            .with(Operation::Get, routes::PLAYER)
            .with(Operation::Create, routes::PLAYERS)
            .with(Operation::Update, routes::PLAYER)
            .with(Operation::Delete, routes::PLAYER)
    }
}
