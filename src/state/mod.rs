mod engine;
mod registry;
mod room;

pub use engine::{schedule_next_round, PickOutcome, ROUND_DELAY};
pub use room::{Room, DEFAULT_POINTS, HAND_SIZE, MAX_POINTS, MIN_POINTS};

use crate::deck::CardPools;
use crate::types::*;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Shared application state: the room registry plus the process-start
/// snapshot of the card pools.
///
/// All mutations of a room go through the registry's write lock, held for
/// the full duration of a transition, so no two actions interleave their
/// reads and writes on the same room.
pub struct AppState {
    pub pools: CardPools,
    pub(crate) rooms: RwLock<HashMap<RoomCode, Room>>,
}

impl AppState {
    pub fn new(pools: CardPools) -> Self {
        Self {
            pools,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Public view of a room, or `None` if the code is unknown.
    pub async fn room_view(&self, code: &str) -> Option<crate::protocol::RoomView> {
        self.rooms.read().await.get(code).map(|r| r.view())
    }

    /// The caller's current hand. Unknown room or player yields an empty
    /// list rather than an error.
    pub async fn hand(&self, code: &str, player_id: &str) -> Vec<Card> {
        self.rooms
            .read()
            .await
            .get(code)
            .and_then(|r| r.hands.get(player_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Current submissions for a room. Empty for unknown codes.
    pub async fn submissions(&self, code: &str) -> Vec<SubmittedCard> {
        self.rooms
            .read()
            .await
            .get(code)
            .map(|r| r.submissions.clone())
            .unwrap_or_default()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}
