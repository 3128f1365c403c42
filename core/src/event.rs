//! Ball descriptors, transition signals and the persisted match event log.
//!
//! RULE: The event log is an audit trail, not a source of truth.
//! Match state is never rebuilt from it; the match document is.

use crate::{
    delivery::{Delivery, DismissalMethod},
    toss::TossDecision,
    types::{MatchId, PlayerId, SelectionSlot, Version},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallEventKind {
    Wicket,
    Boundary,
    Run,
    Extra,
    Dot,
}

/// Description of the most recent ball. Consumed by the narrative port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEvent {
    /// Match version after this ball. Only used to detect a new ball.
    pub id:   Version,
    pub kind: BallEventKind,
    /// "overs.balls" when the ball was counted, e.g. "4.6" for the last
    /// ball of the fifth over.
    pub over: String,
    pub runs: u32,
    pub wicket_method: Option<DismissalMethod>,
    pub batsman_name:  String,
    pub bowler_name:   String,
}

/// What the caller must do after a ball has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionSignal {
    None,
    InningsBreak,
    MatchComplete,
}

/// Every event recorded against a match.
/// Variants may be added, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    MatchCreated {
        team_a: String,
        team_b: String,
        overs:  u32,
    },
    TossResolved {
        winner:   String,
        decision: TossDecision,
    },
    PlayerSelected {
        slot:      SelectionSlot,
        player_id: PlayerId,
        name:      String,
    },
    BallBowled {
        inning:   usize,
        over:     String,
        delivery: Delivery,
        kind:     BallEventKind,
        score:    u32,
        wickets:  u32,
        signal:   TransitionSignal,
    },
    InningsBreak {
        target: u32,
    },
    MatchCompleted {
        result: String,
    },
    ManOfTheMatchAwarded {
        name:      String,
        team_name: String,
    },
    MatchAbandoned,
}

impl MatchEvent {
    /// Stable name for the event_type column in ball_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::MatchCreated { .. }         => "match_created",
            Self::TossResolved { .. }         => "toss_resolved",
            Self::PlayerSelected { .. }       => "player_selected",
            Self::BallBowled { .. }           => "ball_bowled",
            Self::InningsBreak { .. }         => "innings_break",
            Self::MatchCompleted { .. }       => "match_completed",
            Self::ManOfTheMatchAwarded { .. } => "man_of_the_match_awarded",
            Self::MatchAbandoned              => "match_abandoned",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub match_id:   MatchId,
    pub version:    Version,
    pub event_type: String,
    pub payload:    String, // JSON-serialized MatchEvent
}

impl EventLogEntry {
    pub fn new(match_id: &str, version: Version, event: &MatchEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id: None,
            match_id: match_id.to_string(),
            version,
            event_type: event.type_name().to_string(),
            payload: serde_json::to_string(event)?,
        })
    }
}
