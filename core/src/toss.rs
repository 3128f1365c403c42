use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    pub winner:   String,
    pub decision: TossDecision,
}

impl Toss {
    /// (batting team, bowling team) for the first inning.
    pub fn sides<'a>(&'a self, team_a: &'a str, team_b: &'a str) -> (&'a str, &'a str) {
        let loser = if self.winner == team_a { team_b } else { team_a };
        match self.decision {
            TossDecision::Bat  => (self.winner.as_str(), loser),
            TossDecision::Bowl => (loser, self.winner.as_str()),
        }
    }
}
