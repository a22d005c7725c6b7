//! OAuth2 application part.
//!
//! Loaded once at startup from `oauth2/applications/@me`; not kept in a
//! repository.

use serde_json::{json, Value};

use crate::domain::part::{Computed, Part, PartKind};

/// Where users are sent to add the bot.
pub const INVITE_BASE_URL: &str = "https://lorhondel.valzargaming.com/oauth2/authorize";

/// The bot's own application.
pub struct Application;

fn invite_url(part: &Part<Application>) -> Option<Value> {
    part.invite_url_with_permissions(0).map(Value::String)
}

impl PartKind for Application {
    const NAME: &'static str = "Application";
    const FILLABLE: &'static [&'static str] =
        &["name", "description", "icon", "rpc_origins", "flags", "owner"];
    const COMPUTED: &'static [Computed<Self>] = &[Computed::readonly("invite_url", invite_url)];
    type Relations = ();
}

impl Part<Application> {
    /// Invite URL requesting the given permission bits.
    pub fn invite_url_with_permissions(&self, permissions: u64) -> Option<String> {
        let id = self.discriminator()?;
        Some(format!(
            "{INVITE_BASE_URL}?client_id={id}&scope=bot&permissions={permissions}"
        ))
    }

    /// The owner object as sent by the API, if any.
    pub fn owner(&self) -> Option<&Value> {
        self.attribute("owner").filter(|owner| !owner.is_null())
    }
}
