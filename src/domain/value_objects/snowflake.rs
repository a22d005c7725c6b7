//! Discord-style Snowflake ID implementation.
//!
//! Snowflake IDs are 64-bit integers with embedded timestamp information.
//! The remote API sends them as JSON strings or numbers; parts keep them as
//! raw attribute values and parse on demand for computed attributes.
//!
//! ## Structure
//!
//! ```text
//! 64                         22          17          12          0
//! +---------------------------+-----------+-----------+-----------+
//! |         timestamp         |  worker   |  process  |  sequence |
//! |          (42 bits)        |  (5 bits) |  (5 bits) |  (12 bits)|
//! +---------------------------+-----------+-----------+-----------+
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Discord epoch: 2015-01-01T00:00:00Z in milliseconds
pub const DISCORD_EPOCH: u64 = 1420070400000;

/// A Discord-style Snowflake ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(pub u64);

impl Snowflake {
    /// Create a new Snowflake from raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Create a Snowflake from its components.
    #[cfg(test)]
    pub(crate) fn from_parts(timestamp_ms: u64, worker_id: u8, process_id: u8, sequence: u16) -> Self {
        let ts = timestamp_ms.saturating_sub(DISCORD_EPOCH) << 22;
        let worker = ((worker_id as u64) & 0x1F) << 17;
        let process = ((process_id as u64) & 0x1F) << 12;
        let seq = (sequence as u64) & 0xFFF;

        Self(ts | worker | process | seq)
    }

    /// Read a snowflake out of a JSON attribute (string or unsigned number).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64().map(Self),
            _ => None,
        }
    }

    /// Extract the timestamp (milliseconds since the Unix epoch).
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 22) + DISCORD_EPOCH
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
