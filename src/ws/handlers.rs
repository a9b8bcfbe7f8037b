//! WebSocket message dispatch
//!
//! Every inbound action is validated against the addressed room's state;
//! rejections become an `errorMsg` for the acting connection only, while
//! successful transitions broadcast through the room's channel.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::{schedule_next_round, AppState, PickOutcome};
use crate::types::RoomCode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::broadcast;

/// What the socket loop should do after a message was handled.
pub enum Dispatch {
    /// Nothing to tell the sender directly.
    Handled,
    /// Send this message to the acting connection only.
    Reply(ServerMessage),
    /// The connection entered a room; switch its broadcast subscription.
    Joined {
        code: RoomCode,
        rx: broadcast::Receiver<ServerMessage>,
    },
}

fn reject(err: crate::error::RoomError) -> Dispatch {
    Dispatch::Reply(ServerMessage::ErrorMsg {
        text: err.to_string(),
    })
}

/// Handle one client message on behalf of connection `conn_id`.
pub async fn handle_message(msg: ClientMessage, conn_id: &str, state: &Arc<AppState>) -> Dispatch {
    match msg {
        ClientMessage::CreateRoom { name } => {
            let mut rng = StdRng::from_os_rng();
            let (code, rx) = state.create_room(conn_id, &name, &mut rng).await;
            Dispatch::Joined { code, rx }
        }

        ClientMessage::JoinRoom { code, name } => {
            match state.join_room(&code, conn_id, &name).await {
                Ok((code, rx)) => Dispatch::Joined { code, rx },
                Err(e) => reject(e),
            }
        }

        ClientMessage::StartGame {
            code,
            points_to_win,
        } => {
            let mut rng = StdRng::from_os_rng();
            match state
                .start_game(&code, conn_id, points_to_win, &mut rng)
                .await
            {
                Ok(()) => Dispatch::Handled,
                Err(e) => reject(e),
            }
        }

        ClientMessage::SubmitAnswer { code, card_id } => {
            match state.submit_answer(&code, conn_id, &card_id).await {
                Ok(()) => Dispatch::Handled,
                Err(e) => reject(e),
            }
        }

        ClientMessage::PickWinner { code, player_id } => {
            let mut rng = StdRng::from_os_rng();
            match state.pick_winner(&code, conn_id, &player_id, &mut rng).await {
                Ok(PickOutcome::NextRound) => {
                    schedule_next_round(state.clone(), code);
                    Dispatch::Handled
                }
                Ok(PickOutcome::GameOver) => Dispatch::Handled,
                Err(e) => reject(e),
            }
        }

        ClientMessage::ChangeMode { code, mode } => {
            match state.change_mode(&code, conn_id, mode).await {
                Ok(()) => Dispatch::Handled,
                Err(e) => reject(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::CardPools;
    use crate::types::Card;

    fn pools() -> CardPools {
        CardPools {
            prompts: vec![Card {
                id: "p0".into(),
                text: "____?".into(),
            }],
            answers: (0..30)
                .map(|i| Card {
                    id: format!("a{i}"),
                    text: format!("A{i}"),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn join_unknown_room_replies_with_german_error() {
        let state = Arc::new(AppState::new(pools()));
        let result = handle_message(
            ClientMessage::JoinRoom {
                code: "ZZZZ".into(),
                name: "X".into(),
            },
            "c1",
            &state,
        )
        .await;

        match result {
            Dispatch::Reply(ServerMessage::ErrorMsg { text }) => {
                assert_eq!(text, "Raum nicht gefunden.");
            }
            _ => panic!("expected errorMsg reply"),
        }
        assert_eq!(state.room_count().await, 0);
    }

    #[tokio::test]
    async fn create_room_joins_the_creator() {
        let state = Arc::new(AppState::new(pools()));
        let result = handle_message(
            ClientMessage::CreateRoom {
                name: "Anna".into(),
            },
            "c1",
            &state,
        )
        .await;

        let code = match result {
            Dispatch::Joined { code, mut rx } => {
                match rx.try_recv().unwrap() {
                    ServerMessage::RoomUpdate(view) => {
                        assert_eq!(view.host_id, "c1");
                        assert_eq!(view.players[0].name, "Anna");
                    }
                    other => panic!("unexpected message: {other:?}"),
                }
                code
            }
            _ => panic!("expected Joined dispatch"),
        };
        assert!(state.room_view(&code).await.is_some());
    }

    #[tokio::test]
    async fn non_host_start_is_rejected_without_state_change() {
        let state = Arc::new(AppState::new(pools()));
        let Dispatch::Joined { code, .. } = handle_message(
            ClientMessage::CreateRoom {
                name: "Anna".into(),
            },
            "c1",
            &state,
        )
        .await
        else {
            panic!("expected Joined dispatch");
        };
        state.join_room(&code, "c2", "Ben").await.unwrap();

        let result = handle_message(
            ClientMessage::StartGame {
                code: code.clone(),
                points_to_win: Some(5),
            },
            "c2",
            &state,
        )
        .await;
        assert!(matches!(
            result,
            Dispatch::Reply(ServerMessage::ErrorMsg { .. })
        ));
        assert!(!state.room_view(&code).await.unwrap().started);
    }
}
