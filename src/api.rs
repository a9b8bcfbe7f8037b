//! Pull-style HTTP queries used by the client alongside the WebSocket.
//!
//! Both endpoints degrade silently: an unknown room code or player id
//! yields an empty JSON array, never an error.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::state::AppState;
use crate::types::{Card, SubmittedCard};

#[derive(Debug, Deserialize)]
pub struct HandQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub sid: String,
}

/// The caller's current hand.
///
/// GET /hand?code=AB12&sid=<connection id>
pub async fn get_hand(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HandQuery>,
) -> Json<Vec<Card>> {
    if q.code.is_empty() || q.sid.is_empty() {
        return Json(Vec::new());
    }
    Json(state.hand(&q.code, &q.sid).await)
}

#[derive(Debug, Deserialize)]
pub struct SubmissionsQuery {
    #[serde(default)]
    pub code: String,
}

/// The current round's submissions. The judge UI renders only the card
/// texts; the player id rides along for the winner pick.
///
/// GET /submissions?code=AB12
pub async fn get_submissions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SubmissionsQuery>,
) -> Json<Vec<SubmittedCard>> {
    Json(state.submissions(&q.code).await)
}
