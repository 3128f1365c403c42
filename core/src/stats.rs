//! Running-total views derived from a match. Pure; never mutates state.

use crate::{
    inning::Inning,
    match_state::Match,
    roster::{Bowler, Player},
    types::BALLS_PER_OVER,
};
use serde::Serialize;

/// Runs per six legal balls. 0.0 before the first legal ball.
pub fn run_rate(score: u32, legal_balls: u32) -> f64 {
    if legal_balls == 0 {
        return 0.0;
    }
    score as f64 * BALLS_PER_OVER as f64 / legal_balls as f64
}

/// Rate needed from here. 0.0 once nothing is needed or no balls remain.
pub fn required_run_rate(target: u32, score: u32, balls_remaining: u32) -> f64 {
    let needed = target.saturating_sub(score);
    if needed == 0 || balls_remaining == 0 {
        return 0.0;
    }
    needed as f64 * BALLS_PER_OVER as f64 / balls_remaining as f64
}

/// Runs per hundred balls faced.
pub fn strike_rate(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    runs as f64 * 100.0 / balls as f64
}

/// Runs conceded per six legal balls bowled.
pub fn economy(runs_conceded: u32, legal_balls: u32) -> f64 {
    run_rate(runs_conceded, legal_balls)
}

pub fn overs_display(overs: u32, balls: u32) -> String {
    format!("{overs}.{balls}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingLine {
    pub name:  String,
    pub runs:  u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub is_out: bool,
    pub out_by: Option<String>,
}

impl From<&Player> for BattingLine {
    fn from(p: &Player) -> Self {
        Self {
            name: p.name.clone(),
            runs: p.runs,
            balls: p.balls,
            fours: p.fours,
            sixes: p.sixes,
            strike_rate: strike_rate(p.runs, p.balls),
            is_out: p.is_out,
            out_by: p.out_by.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlingLine {
    pub name:    String,
    pub overs:   String,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy: f64,
}

impl From<&Bowler> for BowlingLine {
    fn from(b: &Bowler) -> Self {
        Self {
            name: b.name.clone(),
            overs: overs_display(b.overs, b.balls),
            maidens: b.maidens,
            runs_conceded: b.runs_conceded,
            wickets: b.wickets,
            economy: economy(b.runs_conceded, b.legal_balls()),
        }
    }
}

/// Headline view of the inning in progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scoreboard {
    pub batting_team: String,
    pub bowling_team: String,
    pub score:   u32,
    pub wickets: u32,
    pub overs:   String,
    pub current_run_rate: f64,
    /// Second inning only.
    pub required_run_rate: Option<f64>,
    pub runs_needed:       Option<u32>,
    pub balls_remaining:   u32,
    pub extras: u32,
    pub is_free_hit: bool,
    pub top_batsmen: Vec<BattingLine>,
    pub top_bowlers: Vec<BowlingLine>,
}

impl Scoreboard {
    pub const TOP_N: usize = 3;

    pub fn from_match(m: &Match) -> Option<Self> {
        let inning = m.current_inning()?;
        let balls_remaining = m.balls_remaining();
        let chase = (m.is_chasing() && m.target > 0).then(|| {
            (
                required_run_rate(m.target, inning.score, balls_remaining),
                m.target.saturating_sub(inning.score),
            )
        });

        Some(Self {
            batting_team: inning.batting_team.clone(),
            bowling_team: inning.bowling_team.clone(),
            score: inning.score,
            wickets: inning.wickets,
            overs: inning.over_marker(),
            current_run_rate: run_rate(inning.score, inning.legal_balls()),
            required_run_rate: chase.map(|(rrr, _)| rrr),
            runs_needed: chase.map(|(_, needed)| needed),
            balls_remaining,
            extras: inning.extras.total(),
            is_free_hit: m.is_free_hit,
            top_batsmen: top_batsmen(inning, Self::TOP_N),
            top_bowlers: top_bowlers(inning, Self::TOP_N),
        })
    }
}

/// Batsmen who have faced a ball or scored, most runs first.
pub fn top_batsmen(inning: &Inning, n: usize) -> Vec<BattingLine> {
    let mut batted: Vec<&Player> = inning
        .batsmen
        .iter()
        .filter(|p| p.runs > 0 || p.balls > 0)
        .collect();
    batted.sort_by(|a, b| b.runs.cmp(&a.runs));
    batted.into_iter().take(n).map(BattingLine::from).collect()
}

/// Bowlers who have bowled, most wickets then fewest runs first.
pub fn top_bowlers(inning: &Inning, n: usize) -> Vec<BowlingLine> {
    let mut bowled: Vec<&Bowler> = inning.bowlers.iter().filter(|b| b.has_bowled()).collect();
    bowled.sort_by(|a, b| {
        b.wickets
            .cmp(&a.wickets)
            .then(a.runs_conceded.cmp(&b.runs_conceded))
    });
    bowled.into_iter().take(n).map(BowlingLine::from).collect()
}
