use crate::deck::{CardPools, Deck};
use crate::protocol::{RoomView, ServerMessage};
use crate::types::*;
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Hands are replenished to this size.
pub const HAND_SIZE: usize = 7;

pub const MIN_POINTS: u32 = 3;
pub const MAX_POINTS: u32 = 15;
pub const DEFAULT_POINTS: u32 = 7;

/// Aggregate state for one game instance.
///
/// Card conservation: every answer card is in exactly one of
/// {answer deck, answer discard, a hand, current submissions}, every prompt
/// card in exactly one of {prompt deck, prompt discard, current prompt}.
/// All operations move cards between those places, never copy or drop them.
pub struct Room {
    pub code: RoomCode,
    pub host_id: PlayerId,
    pub players: HashMap<PlayerId, Player>,
    /// Join order; defines the judge rotation. No duplicates.
    pub order: Vec<PlayerId>,
    pub judge_index: usize,
    pub prompt_deck: Deck,
    pub answer_deck: Deck,
    pub hands: HashMap<PlayerId, Vec<Card>>,
    pub submissions: Vec<SubmittedCard>,
    pub round: u32,
    pub started: bool,
    pub points_to_win: u32,
    pub current_prompt: Option<Card>,
    pub mode: Mode,
    /// Room-scoped fan-out to every member's socket.
    tx: broadcast::Sender<ServerMessage>,
}

impl Room {
    /// Fresh room with deep-copied decks and the creator as host and sole
    /// member.
    pub fn new(code: RoomCode, pools: &CardPools, host_id: PlayerId, host_name: &str) -> Self {
        let (tx, _rx) = broadcast::channel(64);
        let mut room = Self {
            code,
            host_id: host_id.clone(),
            players: HashMap::new(),
            order: Vec::new(),
            judge_index: 0,
            prompt_deck: Deck::new(pools.prompts.clone()),
            answer_deck: Deck::new(pools.answers.clone()),
            hands: HashMap::new(),
            submissions: Vec::new(),
            round: 0,
            started: false,
            points_to_win: DEFAULT_POINTS,
            current_prompt: None,
            mode: Mode::default(),
            tx,
        };
        room.add_member(host_id, host_name);
        room
    }

    /// Register a new member at the end of the join order.
    pub fn add_member(&mut self, id: PlayerId, name: &str) {
        debug_assert!(!self.order.contains(&id));
        self.players.insert(id.clone(), Player::new(id.clone(), name));
        self.order.push(id);
    }

    pub fn is_member(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    /// The current judge, `None` only for an empty room.
    pub fn judge_id(&self) -> Option<&PlayerId> {
        if self.order.is_empty() {
            return None;
        }
        self.order.get(self.judge_index % self.order.len())
    }

    /// Draw answer cards until the player holds `HAND_SIZE` or the deck is
    /// empty. Idempotent when the hand is already full. A short hand is a
    /// degraded-continue condition, not an error.
    pub fn replenish_hand<R: Rng>(&mut self, player_id: &str, rng: &mut R) {
        let hand = self.hands.entry(player_id.to_string()).or_default();
        while hand.len() < HAND_SIZE {
            match self.answer_deck.draw(rng) {
                Some(card) => hand.push(card),
                None => {
                    tracing::warn!(
                        room = %self.code,
                        player = %player_id,
                        held = hand.len(),
                        "answer deck exhausted, hand stays short"
                    );
                    break;
                }
            }
        }
    }

    pub fn view(&self) -> RoomView {
        // Listed in join order for a stable lobby display.
        let players = self
            .order
            .iter()
            .filter_map(|id| self.players.get(id))
            .cloned()
            .collect();
        RoomView {
            code: self.code.clone(),
            host_id: self.host_id.clone(),
            players,
            started: self.started,
            points_to_win: self.points_to_win,
            mode: self.mode,
        }
    }

    /// Fan a message out to all members. Send errors (nobody listening) are
    /// ignored, matching the fire-and-forget transport.
    pub fn broadcast(&self, msg: ServerMessage) {
        let _ = self.tx.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.tx.subscribe()
    }
}
