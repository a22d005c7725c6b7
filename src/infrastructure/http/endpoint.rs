//! Endpoint Templates
//!
//! Paths with named `{placeholder}` segments, bound from a part's
//! repository attributes merged with the repository's ambient variables.
//!
//! An unresolved placeholder is a configuration error. Repositories validate
//! placeholder coverage when they are built, so a template that can never be
//! bound is rejected at startup instead of on the first request.

use std::collections::HashMap;
use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use crate::domain::Attributes;
use crate::shared::error::{CacheError, CacheResult};

/// Remote API routes used by the built-in part kinds.
pub mod routes {
    pub const APPLICATION_CURRENT: &str = "oauth2/applications/@me";

    pub const PLAYERS: &str = "players";
    pub const PLAYER: &str = "players/{player_id}";

    pub const PARTIES: &str = "parties";
    pub const PARTY: &str = "parties/{party_id}";

    pub const GUILDS: &str = "users/@me/guilds";
    pub const GUILD: &str = "guilds/{guild_id}";
    pub const GUILD_CHANNELS: &str = "guilds/{guild_id}/channels";

    pub const PRIVATE_CHANNELS: &str = "users/@me/channels";
    pub const CHANNEL: &str = "channels/{channel_id}";

    pub const CHANNEL_MESSAGES: &str = "channels/{channel_id}/messages";
    pub const CHANNEL_MESSAGE: &str = "channels/{channel_id}/messages/{message_id}";

    pub const CHANNEL_THREADS: &str = "channels/{channel_id}/threads";
    pub const THREAD: &str = "channels/{thread_id}";

    pub const THREAD_MEMBERS: &str = "channels/{thread_id}/thread-members";
    pub const THREAD_MEMBER: &str = "channels/{thread_id}/thread-members/{user_id}";
}

/// Characters escaped in a bound value so it stays one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Repository operations that map onto an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Listing, used by `freshen`
    All,
    /// Single read, used by `fetch` and `fresh`
    Get,
    /// Remote creation of a transient part
    Create,
    /// Remote update of a persisted part
    Update,
    /// Remote deletion
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// A path template such as `channels/{channel_id}/messages/{message_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    template: String,
}

impl Endpoint {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn segments(&self) -> CacheResult<Vec<Segment<'_>>> {
        let mut segments = Vec::new();
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Literal(&rest[..open]));
            }
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                CacheError::Configuration(format!("unclosed placeholder in `{}`", self.template))
            })?;
            let name = &after[..close];
            if name.is_empty() || name.contains('{') {
                return Err(CacheError::Configuration(format!(
                    "malformed placeholder in `{}`",
                    self.template
                )));
            }
            segments.push(Segment::Placeholder(name));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest));
        }
        Ok(segments)
    }

    /// Names of every placeholder, in order of appearance.
    pub fn placeholders(&self) -> CacheResult<Vec<&str>> {
        Ok(self
            .segments()?
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name),
                Segment::Literal(_) => None,
            })
            .collect())
    }

    /// Check that every placeholder is covered by one of `known` keys.
    pub fn validate(&self, known: &[&str]) -> CacheResult<()> {
        let missing: Vec<&str> = self
            .placeholders()?
            .into_iter()
            .filter(|name| !known.contains(name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CacheError::Configuration(format!(
                "endpoint `{}` has unbound placeholders: {}",
                self.template,
                missing.join(", ")
            )))
        }
    }

    /// Substitute every placeholder from `vars`.
    ///
    /// Strings are percent-encoded as a single path segment, numbers and
    /// booleans use their JSON rendering. A missing or null variable, or a
    /// `.`/`..` segment, fails the whole binding.
    pub fn bind_assoc(&self, vars: &Attributes) -> CacheResult<String> {
        let mut bound = String::with_capacity(self.template.len());

        for segment in self.segments()? {
            match segment {
                Segment::Literal(text) => bound.push_str(text),
                Segment::Placeholder(name) => match vars.get(name) {
                    Some(Value::String(s)) if s == "." || s == ".." => {
                        return Err(CacheError::Configuration(format!(
                            "placeholder `{}` in `{}` cannot be bound to `{}`",
                            name, self.template, s
                        )))
                    }
                    Some(Value::String(s)) if !s.is_empty() => {
                        bound.extend(utf8_percent_encode(s, SEGMENT))
                    }
                    Some(value @ (Value::Number(_) | Value::Bool(_))) => {
                        bound.push_str(&value.to_string())
                    }
                    _ => {
                        return Err(CacheError::Configuration(format!(
                            "placeholder `{}` in `{}` is unresolved",
                            name, self.template
                        )))
                    }
                },
            }
        }
        Ok(bound)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// The endpoint templates of one repository, keyed by operation.
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    endpoints: HashMap<Operation, Endpoint>,
}

impl Endpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` for `operation`, replacing any previous one.
    pub fn with(mut self, operation: Operation, template: impl Into<String>) -> Self {
        self.endpoints.insert(operation, Endpoint::new(template));
        self
    }

    pub fn get(&self, operation: Operation) -> Option<&Endpoint> {
        self.endpoints.get(&operation)
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.endpoints.contains_key(&operation)
    }

    /// Validate every template against the keys that will be available at bind time.
    pub fn validate(&self, known: &[&str]) -> CacheResult<()> {
        self.endpoints
            .values()
            .try_for_each(|endpoint| endpoint.validate(known))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn vars(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test_case("/players/{player_id}", json!({"player_id": 42}), "/players/42" ; "numeric variable")]
    #[test_case("players/{player_id}", json!({"player_id": "42"}), "players/42" ; "string variable")]
    #[test_case(
        routes::CHANNEL_MESSAGE,
        json!({"channel_id": "2", "message_id": 5, "unused": true}),
        "channels/2/messages/5" ;
        "two placeholders and an unused variable"
    )]
    #[test_case("users/@me/guilds", json!({}), "users/@me/guilds" ; "no placeholders")]
    #[test_case("players/{player_id}", json!({"player_id": "../guilds/1"}), "players/..%2Fguilds%2F1" ; "slashes stay in one segment")]
    #[test_case("players/{player_id}", json!({"player_id": "a b?c#d"}), "players/a%20b%3Fc%23d" ; "reserved characters are escaped")]
    fn test_bind_assoc(template: &str, variables: Value, expected: &str) {
        let bound = Endpoint::new(template).bind_assoc(&vars(variables)).unwrap();
        assert_eq!(bound, expected);
    }

    #[test_case(json!({}) ; "missing variable")]
    #[test_case(json!({"player_id": null}) ; "null variable")]
    #[test_case(json!({"player_id": ""}) ; "empty string")]
    #[test_case(json!({"player_id": ".."}) ; "parent segment")]
    #[test_case(json!({"player_id": "."}) ; "current segment")]
    fn test_bind_assoc_unresolved_is_configuration_error(variables: Value) {
        let result = Endpoint::new("/players/{player_id}").bind_assoc(&vars(variables));
        assert!(matches!(result, Err(CacheError::Configuration(_))));
    }

    #[test]
    fn test_placeholders_in_order() {
        let endpoint = Endpoint::new(routes::THREAD_MEMBER);
        assert_eq!(endpoint.placeholders().unwrap(), vec!["thread_id", "user_id"]);
    }

    #[test]
    fn test_malformed_templates_are_rejected() {
        assert!(Endpoint::new("players/{player_id").placeholders().is_err());
        assert!(Endpoint::new("players/{}").placeholders().is_err());
    }

    #[test]
    fn test_endpoints_validate_reports_missing_keys() {
        let endpoints = Endpoints::new()
            .with(Operation::All, routes::CHANNEL_MESSAGES)
            .with(Operation::Get, routes::CHANNEL_MESSAGE);

        assert!(endpoints.validate(&["channel_id", "message_id"]).is_ok());

        let err = endpoints.validate(&["message_id"]).unwrap_err();
        assert!(err.to_string().contains("channel_id"));
    }

    #[test]
    fn test_endpoints_supports() {
        let endpoints = Endpoints::new().with(Operation::Get, routes::PLAYER);
        assert!(endpoints.supports(Operation::Get));
        assert!(!endpoints.supports(Operation::Delete));
        assert_eq!(Operation::Delete.to_string(), "delete");
    }
}
