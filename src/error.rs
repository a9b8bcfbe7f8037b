//! Error types for the room engine and card pool loading.
//!
//! `RoomError` variants carry the user-facing (German) rejection text as
//! their `Display` output; the WS layer forwards it to the acting
//! connection only. A rejected action never mutates room state.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Raum nicht gefunden.")]
    RoomNotFound,
    #[error("Spiel hat bereits begonnen.")]
    GameAlreadyStarted,
    #[error("Nur der Host kann das.")]
    NotHost,
    #[error("Nur Kurator·in darf wählen.")]
    NotJudge,
    #[error("Kurator·in spielt keine Karte.")]
    JudgeCannotSubmit,
    #[error("Das Spiel läuft noch nicht.")]
    NotStarted,
    #[error("Das Spiel läuft bereits.")]
    AlreadyStarted,
    #[error("Karte nicht gefunden.")]
    InvalidCard,
    #[error("Spieler·in nicht gefunden.")]
    UnknownPlayer,
    #[error("Du hast bereits abgegeben.")]
    AlreadySubmitted,
}

/// Failure while loading the card pools at process start.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read card pool {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse card pool {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}
