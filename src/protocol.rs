//! Wire protocol between clients and the room engine.
//!
//! All messages travel as JSON over the WebSocket, tagged with `"t"`.
//! Inbound messages are client actions addressed to a room by code;
//! outbound messages are either room-scoped broadcasts or a direct
//! `errorMsg` to the acting connection.

use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    CreateRoom {
        name: String,
    },
    JoinRoom {
        code: String,
        name: String,
    },
    StartGame {
        code: RoomCode,
        points_to_win: Option<u32>,
    },
    SubmitAnswer {
        code: RoomCode,
        card_id: CardId,
    },
    PickWinner {
        code: RoomCode,
        player_id: PlayerId,
    },
    ChangeMode {
        code: RoomCode,
        mode: Mode,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoomUpdate(RoomView),
    NewRound {
        round: u32,
        judge_id: PlayerId,
        /// Absent only when both prompt deck and discard are exhausted.
        prompt: Option<Card>,
    },
    SubmissionsCount {
        n: usize,
    },
    AllSubmitted,
    RoundResult {
        winner_id: PlayerId,
        winner_name: String,
        /// The winning submission, if the picked player submitted one.
        #[serde(skip_serializing_if = "Option::is_none")]
        card: Option<Card>,
        #[serde(skip_serializing_if = "Option::is_none")]
        prompt: Option<Card>,
    },
    GameOver {
        winner_id: PlayerId,
        winner_name: String,
    },
    ErrorMsg {
        text: String,
    },
}

/// Public view of a room, broadcast to all members. Hands, decks and
/// submissions are deliberately absent; those are served through the
/// pull-style queries instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub code: RoomCode,
    pub host_id: PlayerId,
    pub players: Vec<Player>,
    pub started: bool,
    pub points_to_win: u32,
    pub mode: Mode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_use_camel_case_tags() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"joinRoom","code":"ab12","name":"Anna"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::JoinRoom { .. }));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"submitAnswer","code":"AB12","cardId":"a7"}"#).unwrap();
        match msg {
            ClientMessage::SubmitAnswer { card_id, .. } => assert_eq!(card_id, "a7"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn room_update_flattens_the_view() {
        let view = RoomView {
            code: "AB12".into(),
            host_id: "p1".into(),
            players: vec![Player::new("p1".into(), "Anna")],
            started: false,
            points_to_win: 7,
            mode: Mode::Office,
        };
        let json = serde_json::to_value(ServerMessage::RoomUpdate(view)).unwrap();
        assert_eq!(json["t"], "roomUpdate");
        assert_eq!(json["hostId"], "p1");
        assert_eq!(json["pointsToWin"], 7);
        assert_eq!(json["mode"], "office");
    }

    #[test]
    fn change_mode_accepts_unknown_mode_strings() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"changeMode","code":"AB12","mode":"party"}"#).unwrap();
        match msg {
            ClientMessage::ChangeMode { mode, .. } => assert_eq!(mode, Mode::Office),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn error_msg_carries_text() {
        let json =
            serde_json::to_value(ServerMessage::ErrorMsg { text: "Raum nicht gefunden.".into() })
                .unwrap();
        assert_eq!(json["t"], "errorMsg");
        assert_eq!(json["text"], "Raum nicht gefunden.");
    }
}
