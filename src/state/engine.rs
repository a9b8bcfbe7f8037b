//! The per-round state machine.
//!
//! Lobby -> Submitting -> Judging -> Resolved -> {next round | game over}.
//! Every transition is guarded; an invalid action (wrong actor, wrong
//! phase, unknown id) leaves the room untouched and surfaces a rejection
//! only to the acting connection.

use super::{AppState, Room, DEFAULT_POINTS, MAX_POINTS, MIN_POINTS};
use crate::error::RoomError;
use crate::protocol::ServerMessage;
use crate::types::*;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

/// Pause between a round result and the next round.
pub const ROUND_DELAY: Duration = Duration::from_millis(600);

/// What `pick_winner` decided about the room's future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Threshold not reached; the caller schedules the next round.
    NextRound,
    /// Somebody won; the room is back in the lobby.
    GameOver,
}

impl AppState {
    /// Host-only: deal initial hands and kick off round 1.
    pub async fn start_game<R: Rng>(
        &self,
        code: &str,
        conn_id: &str,
        points_to_win: Option<u32>,
        rng: &mut R,
    ) -> Result<(), RoomError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(code).ok_or(RoomError::RoomNotFound)?;
        if room.host_id != conn_id {
            return Err(RoomError::NotHost);
        }
        if room.started {
            return Err(RoomError::AlreadyStarted);
        }

        room.points_to_win = points_to_win
            .filter(|&p| p > 0)
            .unwrap_or(DEFAULT_POINTS)
            .clamp(MIN_POINTS, MAX_POINTS);
        room.started = true;

        for id in room.order.clone() {
            room.replenish_hand(&id, rng);
        }
        tracing::info!(
            room = %code,
            players = room.order.len(),
            points_to_win = room.points_to_win,
            "game started"
        );
        begin_round(room, rng);
        Ok(())
    }

    /// A non-judge player plays one card from their own hand.
    pub async fn submit_answer(
        &self,
        code: &str,
        conn_id: &str,
        card_id: &str,
    ) -> Result<(), RoomError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(code).ok_or(RoomError::RoomNotFound)?;
        if !room.started {
            return Err(RoomError::NotStarted);
        }
        if room.judge_id() == Some(&conn_id.to_string()) {
            return Err(RoomError::JudgeCannotSubmit);
        }
        if room.submissions.iter().any(|s| s.player_id == conn_id) {
            return Err(RoomError::AlreadySubmitted);
        }

        let hand = room.hands.get_mut(conn_id).ok_or(RoomError::InvalidCard)?;
        let idx = hand
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(RoomError::InvalidCard)?;
        let card = hand.remove(idx);
        room.submissions.push(SubmittedCard {
            player_id: conn_id.to_string(),
            card,
        });

        let n = room.submissions.len();
        room.broadcast(ServerMessage::SubmissionsCount { n });
        // Everyone but the judge has played.
        if n == room.order.len() - 1 {
            room.broadcast(ServerMessage::AllSubmitted);
        }
        Ok(())
    }

    /// Judge-only: award the round, recycle the played cards, replenish
    /// the submitters' hands, and either end the game or report that the
    /// next round should be scheduled.
    pub async fn pick_winner<R: Rng>(
        &self,
        code: &str,
        conn_id: &str,
        player_id: &str,
        rng: &mut R,
    ) -> Result<PickOutcome, RoomError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(code).ok_or(RoomError::RoomNotFound)?;
        if !room.started {
            return Err(RoomError::NotStarted);
        }
        if room.judge_id() != Some(&conn_id.to_string()) {
            return Err(RoomError::NotJudge);
        }
        let winner = room
            .players
            .get_mut(player_id)
            .ok_or(RoomError::UnknownPlayer)?;
        winner.score += 1;
        let winner_id = winner.id.clone();
        let winner_name = winner.name.clone();

        let winning_card = room
            .submissions
            .iter()
            .find(|s| s.player_id == player_id)
            .map(|s| s.card.clone());
        room.broadcast(ServerMessage::RoundResult {
            winner_id: winner_id.clone(),
            winner_name: winner_name.clone(),
            card: winning_card,
            prompt: room.current_prompt.clone(),
        });

        // Played cards go to the discard, submitters draw back up.
        let submitters: Vec<PlayerId> = room
            .submissions
            .iter()
            .map(|s| s.player_id.clone())
            .collect();
        for sub in std::mem::take(&mut room.submissions) {
            room.answer_deck.discard.push(sub.card);
        }
        for id in submitters {
            room.replenish_hand(&id, rng);
        }

        // Only the picked winner's score changed, so only they can newly
        // reach the threshold.
        let max_score = room.players.values().map(|p| p.score).max().unwrap_or(0);
        if max_score >= room.points_to_win {
            tracing::info!(room = %code, winner = %winner_name, "game over");
            room.broadcast(ServerMessage::GameOver {
                winner_id,
                winner_name,
            });
            room.started = false;
            return Ok(PickOutcome::GameOver);
        }
        Ok(PickOutcome::NextRound)
    }

    /// Host-only, lobby-only: toggle the cosmetic ruleset flag.
    pub async fn change_mode(
        &self,
        code: &str,
        conn_id: &str,
        mode: Mode,
    ) -> Result<(), RoomError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(code).ok_or(RoomError::RoomNotFound)?;
        if room.host_id != conn_id {
            return Err(RoomError::NotHost);
        }
        if room.started {
            return Err(RoomError::AlreadyStarted);
        }
        room.mode = mode;
        room.broadcast(ServerMessage::RoomUpdate(room.view()));
        Ok(())
    }

    /// Delayed-tick entry point: start the next round if the room still
    /// exists and the game is still running, otherwise do nothing. Safe to
    /// fire after the room was destroyed.
    pub async fn next_round<R: Rng>(&self, code: &str, rng: &mut R) -> bool {
        let mut rooms = self.rooms.write().await;
        match rooms.get_mut(code) {
            Some(room) if room.started => {
                begin_round(room, rng);
                true
            }
            _ => {
                tracing::debug!(room = %code, "next-round tick for gone or stopped room, ignoring");
                false
            }
        }
    }
}

/// Advance to the next round: rotate the judge, recycle and draw the
/// prompt, reset the submissions, announce.
fn begin_round<R: Rng>(room: &mut Room, rng: &mut R) {
    room.round += 1;
    // Round 1 is always judged by the first joiner.
    room.judge_index = if room.round == 1 {
        0
    } else {
        (room.judge_index + 1) % room.order.len()
    };

    // Last round's prompt is done with; keep it in circulation.
    if let Some(prev) = room.current_prompt.take() {
        room.prompt_deck.discard.push(prev);
    }
    if room.prompt_deck.is_empty() {
        room.prompt_deck.refill_from_discard();
    }
    room.current_prompt = room.prompt_deck.draw(rng);
    if room.current_prompt.is_none() {
        tracing::warn!(room = %room.code, "prompt pool exhausted, round continues without prompt");
    }
    room.submissions.clear();

    let judge_id = room.judge_id().cloned().unwrap_or_default();
    tracing::debug!(room = %room.code, round = room.round, judge = %judge_id, "round started");
    room.broadcast(ServerMessage::NewRound {
        round: room.round,
        judge_id,
        prompt: room.current_prompt.clone(),
    });
    room.broadcast(ServerMessage::SubmissionsCount { n: 0 });
}

/// Fire-and-forget timer between rounds. The tick re-validates room
/// existence and game state; a room destroyed during the delay makes this
/// a no-op.
pub fn schedule_next_round(state: Arc<AppState>, code: RoomCode) {
    tokio::spawn(async move {
        tokio::time::sleep(ROUND_DELAY).await;
        let mut rng = rand::rngs::StdRng::from_os_rng();
        state.next_round(&code, &mut rng).await;
    });
}
