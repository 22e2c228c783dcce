//! Commands accepted by the hyprtile daemon.
//!
//! The vocabulary is deliberately tiny: tiling is a one-shot action, so the
//! only command is [`Command::Tile`]. The wire format is one line of JSON
//! per command; both the bare form and the object form are accepted:
//!
//! ```json
//! "Tile"
//! {"Tile":{"source":"keybind"}}
//! ```
//!
//! The optional `source` names whatever triggered the request (a key bind,
//! a menu entry, a script). It is logged and otherwise unused.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Payload of a tiling trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRequest {
    /// Originating context of the trigger, for logging only.
    #[serde(default)]
    pub source: Option<String>,
}

/// Every action the daemon can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the main loop, which hands each one to a
/// [`WindowTiler`](crate::tiler::WindowTiler) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Command {
    /// Arrange all eligible windows on the primary monitor into a grid.
    Tile(TileRequest),
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Command;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "\"Tile\" or {{\"Tile\": {{...}}}}")
            }
            fn visit_str<E>(self, s: &str) -> Result<Command, E>
            where
                E: DeError,
            {
                match s {
                    "Tile" => Ok(Command::Tile(TileRequest::default())),
                    other => Err(DeError::custom(format!("unknown command: {:?}", other))),
                }
            }
            fn visit_map<A>(self, mut map: A) -> Result<Command, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let key: String = map
                    .next_key()?
                    .ok_or_else(|| DeError::custom("empty command object"))?;
                match key.as_str() {
                    "Tile" => Ok(Command::Tile(map.next_value()?)),
                    other => Err(DeError::custom(format!("unknown command: {:?}", other))),
                }
            }
        }
        deserializer.deserialize_any(V)
    }
}
