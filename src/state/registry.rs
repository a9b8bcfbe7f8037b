//! Room registry: code generation, membership lifecycle, garbage
//! collection of empty rooms.

use super::{AppState, Room};
use crate::error::RoomError;
use crate::protocol::ServerMessage;
use crate::types::*;
use rand::Rng;
use tokio::sync::broadcast;

/// Safe character set for room codes (no 0/O, 1/I to avoid confusion).
const CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 4;

fn generate_code<R: Rng>(rng: &mut R) -> RoomCode {
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

impl AppState {
    /// Create a room with the caller as host and sole member. Returns the
    /// code and a subscription to the room's broadcasts; the initial
    /// `roomUpdate` is sent after subscribing so the creator receives it.
    pub async fn create_room<R: Rng>(
        &self,
        conn_id: &str,
        name: &str,
        rng: &mut R,
    ) -> (RoomCode, broadcast::Receiver<ServerMessage>) {
        let mut rooms = self.rooms.write().await;

        // A code is reusable once its room is destroyed, so collisions only
        // matter against live rooms.
        let code = loop {
            let code = generate_code(rng);
            if !rooms.contains_key(&code) {
                break code;
            }
        };

        let room = Room::new(code.clone(), &self.pools, conn_id.to_string(), name);
        let rx = room.subscribe();
        room.broadcast(ServerMessage::RoomUpdate(room.view()));
        tracing::info!(room = %code, host = %conn_id, "room created");
        rooms.insert(code.clone(), room);

        (code, rx)
    }

    /// Join an existing room. Late joins to a started game are rejected,
    /// but a connection that is already a member may rejoin (e.g. after a
    /// reconnect that reuses the same handle) without being duplicated in
    /// the join order.
    pub async fn join_room(
        &self,
        code: &str,
        conn_id: &str,
        name: &str,
    ) -> Result<(RoomCode, broadcast::Receiver<ServerMessage>), RoomError> {
        let code = code.trim().to_uppercase();
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(&code).ok_or(RoomError::RoomNotFound)?;

        if room.is_member(conn_id) {
            // Rejoin: keep the existing record (and score) untouched.
            let rx = room.subscribe();
            room.broadcast(ServerMessage::RoomUpdate(room.view()));
            return Ok((code, rx));
        }
        if room.started {
            return Err(RoomError::GameAlreadyStarted);
        }

        room.add_member(conn_id.to_string(), name);
        let rx = room.subscribe();
        room.broadcast(ServerMessage::RoomUpdate(room.view()));
        tracing::info!(room = %code, player = %conn_id, "player joined");

        Ok((code, rx))
    }

    /// Remove a member, transactionally: their cards go to the answer
    /// discard, the host role moves to the next player in join order if
    /// needed, and the room is destroyed once empty.
    pub async fn remove_member(&self, code: &str, conn_id: &str) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(code) else {
            return;
        };
        if room.players.remove(conn_id).is_none() {
            return;
        }
        room.order.retain(|id| id != conn_id);

        // Return the leaver's cards to circulation.
        if let Some(hand) = room.hands.remove(conn_id) {
            room.answer_deck.discard.extend(hand);
        }
        if let Some(pos) = room.submissions.iter().position(|s| s.player_id == conn_id) {
            let sub = room.submissions.remove(pos);
            room.answer_deck.discard.push(sub.card);
            // Remaining clients would otherwise show a stale count.
            room.broadcast(ServerMessage::SubmissionsCount {
                n: room.submissions.len(),
            });
        }

        if room.order.is_empty() {
            tracing::info!(room = %code, "last player left, destroying room");
            rooms.remove(code);
            return;
        }
        if room.host_id == conn_id {
            room.host_id = room.order[0].clone();
            tracing::info!(room = %code, host = %room.host_id, "host reassigned");
        }
        room.broadcast(ServerMessage::RoomUpdate(room.view()));
    }
}
