//! Shared primitive types used across the whole scorebook.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a match document (`match_<uuid>`).
pub type MatchId = String;

/// Roster slot identifier, unique within one side of an inning (1-based).
pub type PlayerId = u32;

/// Monotonic per-match version. Bumped on every accepted transition.
pub type Version = u64;

/// Players per side. Every inning roster has exactly this many slots.
pub const SQUAD_SIZE: usize = 11;

/// An inning ends when this many wickets have fallen.
pub const MAX_WICKETS: u32 = 10;

pub const BALLS_PER_OVER: u32 = 6;

/// The three player slots that must be filled before a ball is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSlot {
    Striker,
    NonStriker,
    Bowler,
}

impl fmt::Display for SelectionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Striker    => "striker",
            Self::NonStriker => "non-striker",
            Self::Bowler     => "bowler",
        })
    }
}
