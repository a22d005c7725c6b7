//! Party part.

use serde_json::{json, Value};

use crate::domain::part::{Attributes, Computed, Part, PartKind};
use crate::infrastructure::http::{routes, Endpoints, Operation};

/// A group of players adventuring together.
pub struct Party;

fn size(part: &Part<Party>) -> Option<Value> {
    let members = part.attribute("member_ids")?.as_array()?;
    Some(json!(members.len()))
}

impl PartKind for Party {
    const NAME: &'static str = "Party";
    const FILLABLE: &'static [&'static str] = &["name", "leader_id", "member_ids"];
    const COMPUTED: &'static [Computed<Self>] = &[Computed::readonly("size", size)];
    type Relations = ();

    fn repository_keys() -> Vec<&'static str> {
        vec!["party_id"]
    }

    fn repository_attributes(part: &Part<Self>) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(id) = part.attribute("id") {
            attributes.insert("party_id".into(), id.clone());
        }
        attributes
    }
}

impl Party {
    pub fn endpoints() -> Endpoints {
        Endpoints::new()
            .with(Operation::All, routes::PARTIES)
            .with(Operation::Get, routes::PARTY)
            .with(Operation::Create, routes::PARTIES)
            .with(Operation::Update, routes::PARTY)
            .with(Operation::Delete, routes::PARTY)
    }
}
