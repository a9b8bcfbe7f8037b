use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type PlayerId = String;
pub type CardId = String;
pub type RoomCode = String;

/// Maximum length of a player name; longer names are cut off.
pub const MAX_NAME_LEN: usize = 20;

/// Name used when a player joins without one.
pub const DEFAULT_NAME: &str = "Gast";

/// A single game card. Immutable once created; identity is `id`.
/// Prompt cards may contain a `____` blank marker in their text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub text: String,
}

/// A connected player inside a room. `id` is the transient connection
/// identifier and is not stable across reconnects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: &str) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name.chars().take(MAX_NAME_LEN).collect()
        };
        Self { id, name, score: 0 }
    }
}

/// Cosmetic ruleset flag, broadcast as part of the room view but without
/// gameplay semantics in the engine.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Office,
    Open,
}

// Anything other than "open" means "office"; an unknown mode string must
// not make the whole message unparseable.
impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "open" {
            Mode::Open
        } else {
            Mode::Office
        })
    }
}

/// One answer card played by a player this round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedCard {
    #[serde(rename = "playerId")]
    pub player_id: PlayerId,
    pub card: Card,
}
