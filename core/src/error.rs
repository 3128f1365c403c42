use crate::types::{MatchId, PlayerId, SelectionSlot};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    // ── Precondition violations ────────────────────────────────
    #[error("Select a {missing} before the next ball")]
    PreconditionViolation { missing: SelectionSlot },

    #[error("Match has not started: the toss is not resolved")]
    MatchNotStarted,

    #[error("Toss already resolved")]
    MatchAlreadyStarted,

    #[error("Match is complete; no further balls are accepted")]
    MatchComplete,

    #[error("Match is still in progress")]
    MatchNotComplete,

    #[error("Match has already been finished and archived")]
    MatchAlreadyFinished,

    #[error("Current inning is closed")]
    InningsClosed,

    // ── Invalid input ──────────────────────────────────────────
    #[error("Invalid runs off the bat: {runs} (allowed: 0, 1, 2, 3, 4, 6)")]
    InvalidRuns { runs: u32 },

    #[error("Invalid delivery: {reason}")]
    InvalidDelivery { reason: String },

    #[error("No {slot} with id {player_id} in the current inning")]
    PlayerNotFound { slot: SelectionSlot, player_id: PlayerId },

    #[error("Player '{name}' did not take part in this match")]
    UnknownPlayer { name: String },

    #[error("Batsman {player_id} is already out")]
    PlayerAlreadyOut { player_id: PlayerId },

    #[error("Batsman {player_id} is already at the crease")]
    PlayerAlreadySelected { player_id: PlayerId },

    #[error("Bowler {bowler_id} is mid-over and cannot be replaced")]
    OverInProgress { bowler_id: PlayerId },

    #[error("Invalid match setup: {reason}")]
    InvalidSetup { reason: String },

    #[error("Toss winner '{team}' is not playing this match")]
    InvalidToss { team: String },

    // ── External services ──────────────────────────────────────
    #[error("Match '{match_id}' not found")]
    MatchNotFound { match_id: MatchId },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Narrative service error: {0}")]
    Narrative(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScoreError {
    /// True for errors the scorer can fix by changing their input.
    /// External failures (storage, narrative) are never user-actionable.
    pub fn is_user_actionable(&self) -> bool {
        !matches!(
            self,
            Self::MatchNotFound { .. }
                | Self::Database(_)
                | Self::Serialization(_)
                | Self::Narrative(_)
                | Self::Other(_)
        )
    }
}

pub type ScoreResult<T> = Result<T, ScoreError>;
