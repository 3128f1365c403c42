//! Ball input: what happened on one delivery.
//!
//! Extras and dismissals are closed enums. Every consumer matches them
//! exhaustively, so a new kind cannot be silently ignored.

use crate::error::{ScoreError, ScoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runs a batsman may be credited off the bat on one delivery.
pub const VALID_RUNS_OFF_BAT: [u32; 6] = [0, 1, 2, 3, 4, 6];

/// Upper bound on `Extra::runs` for one delivery.
pub const MAX_EXTRA_RUNS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtraKind {
    /// Wides and no-balls do not count toward the six balls of an over.
    pub fn is_legal_ball(&self) -> bool {
        matches!(self, Self::Bye | Self::LegBye)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    pub kind: ExtraKind,
    pub runs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalMethod {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
}

impl DismissalMethod {
    pub const ALL: [DismissalMethod; 6] = [
        Self::Bowled,
        Self::Caught,
        Self::Lbw,
        Self::RunOut,
        Self::Stumped,
        Self::HitWicket,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bowled    => "Bowled",
            Self::Caught    => "Caught",
            Self::Lbw       => "LBW",
            Self::RunOut    => "Run Out",
            Self::Stumped   => "Stumped",
            Self::HitWicket => "Hit Wicket",
        }
    }

    /// Only a run-out stands on a free hit.
    pub fn stands_on_free_hit(&self) -> bool {
        matches!(self, Self::RunOut)
    }

    /// A fielder is normally named for these; it is still optional.
    pub fn involves_fielder(&self) -> bool {
        matches!(self, Self::Caught | Self::RunOut | Self::Stumped)
    }
}

impl fmt::Display for DismissalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wicket {
    pub method: DismissalMethod,
    #[serde(default)]
    pub fielder_name: Option<String>,
}

impl Wicket {
    pub fn new(method: DismissalMethod) -> Self {
        Self { method, fielder_name: None }
    }

    pub fn by(method: DismissalMethod, fielder: impl Into<String>) -> Self {
        Self {
            method,
            fielder_name: Some(fielder.into()),
        }
    }

    /// Scorecard text for this dismissal. Without a fielder the fielder
    /// clause is dropped rather than rejected.
    pub fn dismissal_text(&self, bowler_name: &str) -> String {
        match (self.method, self.fielder_name.as_deref()) {
            (DismissalMethod::Caught, Some(f))  => format!("c {f} b {bowler_name}"),
            (DismissalMethod::Stumped, Some(f)) => format!("st {f} b {bowler_name}"),
            (DismissalMethod::RunOut, Some(f))  => format!("run out ({f})"),
            (DismissalMethod::RunOut, None)     => "run out".to_string(),
            (method, _) => format!("{} b {bowler_name}", method.label()),
        }
    }
}

/// One delivery as submitted by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub runs_off_bat: u32,
    #[serde(default)]
    pub extra: Option<Extra>,
    #[serde(default)]
    pub wicket: Option<Wicket>,
}

impl Delivery {
    pub fn runs(runs_off_bat: u32) -> Self {
        Self {
            runs_off_bat,
            ..Self::default()
        }
    }

    pub fn dot() -> Self {
        Self::runs(0)
    }

    pub fn wide(runs: u32) -> Self {
        Self::extra(ExtraKind::Wide, runs)
    }

    /// `runs` is the extras field for the no-ball; bat runs are separate.
    pub fn no_ball(runs_off_bat: u32, runs: u32) -> Self {
        Self {
            runs_off_bat,
            extra: Some(Extra { kind: ExtraKind::NoBall, runs }),
            wicket: None,
        }
    }

    pub fn byes(runs: u32) -> Self {
        Self::extra(ExtraKind::Bye, runs)
    }

    pub fn leg_byes(runs: u32) -> Self {
        Self::extra(ExtraKind::LegBye, runs)
    }

    pub fn extra(kind: ExtraKind, runs: u32) -> Self {
        Self {
            runs_off_bat: 0,
            extra: Some(Extra { kind, runs }),
            wicket: None,
        }
    }

    pub fn with_wicket(mut self, wicket: Wicket) -> Self {
        self.wicket = Some(wicket);
        self
    }

    pub fn extra_kind(&self) -> Option<ExtraKind> {
        self.extra.map(|e| e.kind)
    }

    pub fn extra_runs(&self) -> u32 {
        self.extra.map_or(0, |e| e.runs)
    }

    pub fn total_runs(&self) -> u32 {
        self.runs_off_bat + self.extra_runs()
    }

    /// Plain deliveries and byes/leg-byes advance the over.
    pub fn is_legal(&self) -> bool {
        self.extra.map_or(true, |e| e.kind.is_legal_ball())
    }

    /// Runs that decide whether the batsmen have crossed.
    pub fn runs_for_rotation(&self) -> u32 {
        match self.extra {
            Some(Extra { kind: ExtraKind::Bye | ExtraKind::LegBye, runs }) => runs,
            _ => self.runs_off_bat,
        }
    }

    pub fn validate(&self) -> ScoreResult<()> {
        if !VALID_RUNS_OFF_BAT.contains(&self.runs_off_bat) {
            return Err(ScoreError::InvalidRuns { runs: self.runs_off_bat });
        }
        match self.extra {
            Some(extra) if extra.runs > MAX_EXTRA_RUNS => Err(ScoreError::InvalidDelivery {
                reason: format!(
                    "{:?} carries {} runs (max {MAX_EXTRA_RUNS})",
                    extra.kind, extra.runs
                ),
            }),
            _ => Ok(()),
        }
    }
}
