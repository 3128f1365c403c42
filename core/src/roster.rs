//! Per-inning player records.
//!
//! RULE: Roster entries are created once at inning setup and never removed.
//! Only the ball processor mutates their accumulators.

use crate::types::PlayerId;
use serde::{Deserialize, Serialize};

/// One name on a team sheet, as entered at match setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSheetEntry {
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
    #[serde(default)]
    pub is_wicket_keeper: bool,
}

impl TeamSheetEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Batting identity and accumulators for one slot of the batting side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id:    PlayerId,
    pub name:  String,
    pub photo: Option<String>,
    pub runs:  u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
    /// Dismissal text, e.g. "c Smith b Jones". Set when `is_out` flips.
    pub out_by: Option<String>,
    pub is_captain:       bool,
    pub is_vice_captain:  bool,
    pub is_wicket_keeper: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, photo: Option<String>) -> Self {
        Self {
            id,
            name,
            photo,
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            is_out: false,
            out_by: None,
            is_captain: false,
            is_vice_captain: false,
            is_wicket_keeper: false,
        }
    }

    /// Faced at least one ball or was dismissed.
    pub fn has_batted(&self) -> bool {
        self.balls > 0 || self.is_out
    }
}

/// Bowling identity and accumulators for one slot of the fielding side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bowler {
    pub id:    PlayerId,
    pub name:  String,
    pub photo: Option<String>,
    pub overs: u32,
    /// Legal balls in the over currently being bowled (0–5).
    pub balls: u32,
    /// Not derived by the engine; carried for display.
    pub maidens:       u32,
    pub runs_conceded: u32,
    pub wickets:       u32,
    pub is_wicket_keeper: bool,
}

impl Bowler {
    pub fn new(id: PlayerId, name: String, photo: Option<String>) -> Self {
        Self {
            id,
            name,
            photo,
            overs: 0,
            balls: 0,
            maidens: 0,
            runs_conceded: 0,
            wickets: 0,
            is_wicket_keeper: false,
        }
    }

    pub fn has_bowled(&self) -> bool {
        self.overs > 0 || self.balls > 0
    }

    pub fn legal_balls(&self) -> u32 {
        self.overs * crate::types::BALLS_PER_OVER + self.balls
    }
}
