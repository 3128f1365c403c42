//! Career aggregates, folded from completed matches.
//!
//! Profiles are keyed by player name. A name that appears on both sides of
//! different matches is one profile.

use crate::{match_state::Match, stats, types::BALLS_PER_OVER};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Starting value for best-bowling runs, so any real figure beats it.
pub const NO_BEST_BOWLING_RUNS: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name:  String,
    pub photo: Option<String>,
    pub matches_played: u32,
    // ── Batting ──
    pub innings_batted: u32,
    pub total_runs:     u32,
    pub balls_faced:    u32,
    pub fours:          u32,
    pub sixes:          u32,
    pub not_outs:       u32,
    pub highest_score:  u32,
    // ── Bowling ──
    pub balls_bowled:   u32,
    pub runs_conceded:  u32,
    pub wickets_taken:  u32,
    pub best_bowling_wickets: u32,
    pub best_bowling_runs:    u32,
}

impl PlayerProfile {
    pub fn empty(name: &str, photo: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            photo,
            matches_played: 0,
            innings_batted: 0,
            total_runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            not_outs: 0,
            highest_score: 0,
            balls_bowled: 0,
            runs_conceded: 0,
            wickets_taken: 0,
            best_bowling_wickets: 0,
            best_bowling_runs: NO_BEST_BOWLING_RUNS,
        }
    }

    /// None until the player has been dismissed at least once.
    pub fn batting_average(&self) -> Option<f64> {
        let dismissals = self.innings_batted.saturating_sub(self.not_outs);
        (dismissals > 0).then(|| self.total_runs as f64 / dismissals as f64)
    }

    pub fn strike_rate(&self) -> f64 {
        stats::strike_rate(self.total_runs, self.balls_faced)
    }

    pub fn economy(&self) -> f64 {
        stats::economy(self.runs_conceded, self.balls_bowled)
    }

    pub fn overs_bowled(&self) -> String {
        stats::overs_display(self.balls_bowled / BALLS_PER_OVER, self.balls_bowled % BALLS_PER_OVER)
    }

    /// "3/21", or "-" if the player has never bowled.
    pub fn best_bowling(&self) -> String {
        if self.best_bowling_runs == NO_BEST_BOWLING_RUNS {
            "-".to_string()
        } else {
            format!("{}/{}", self.best_bowling_wickets, self.best_bowling_runs)
        }
    }

    fn adopt_photo(&mut self, photo: &Option<String>) {
        if photo.is_some() {
            self.photo = photo.clone();
        }
    }
}

fn profile_for<'a>(
    profiles: &'a mut Vec<PlayerProfile>,
    name: &str,
    photo: &Option<String>,
) -> &'a mut PlayerProfile {
    let index = match profiles.iter().position(|p| p.name == name) {
        Some(i) => i,
        None => {
            profiles.push(PlayerProfile::empty(name, photo.clone()));
            profiles.len() - 1
        }
    };
    &mut profiles[index]
}

/// Fold one finished match into the profile list.
///
/// Batsmen count when they faced a ball or were dismissed; bowlers when they
/// bowled a ball. `matches_played` rises once per name per match.
pub fn fold_match_into_profiles(m: &Match, mut profiles: Vec<PlayerProfile>) -> Vec<PlayerProfile> {
    let mut seen: HashSet<String> = HashSet::new();

    for inning in &m.innings {
        for batsman in inning.batsmen.iter().filter(|p| p.has_batted()) {
            let profile = profile_for(&mut profiles, &batsman.name, &batsman.photo);
            if seen.insert(batsman.name.clone()) {
                profile.matches_played += 1;
            }
            profile.innings_batted += 1;
            profile.total_runs += batsman.runs;
            profile.balls_faced += batsman.balls;
            profile.fours += batsman.fours;
            profile.sixes += batsman.sixes;
            if !batsman.is_out {
                profile.not_outs += 1;
            }
            profile.highest_score = profile.highest_score.max(batsman.runs);
            profile.adopt_photo(&batsman.photo);
        }

        for bowler in inning.bowlers.iter().filter(|b| b.has_bowled()) {
            let profile = profile_for(&mut profiles, &bowler.name, &bowler.photo);
            if seen.insert(bowler.name.clone()) {
                profile.matches_played += 1;
            }
            profile.balls_bowled += bowler.legal_balls();
            profile.runs_conceded += bowler.runs_conceded;
            profile.wickets_taken += bowler.wickets;
            if bowler.wickets > profile.best_bowling_wickets
                || (bowler.wickets == profile.best_bowling_wickets
                    && bowler.runs_conceded < profile.best_bowling_runs)
            {
                profile.best_bowling_wickets = bowler.wickets;
                profile.best_bowling_runs = bowler.runs_conceded;
            }
            profile.adopt_photo(&bowler.photo);
        }
    }

    log::debug!("folded match {} into {} profiles", m.id, profiles.len());
    profiles
}

/// Derive every profile from scratch. Same input, same output.
pub fn rebuild_profiles<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Vec<PlayerProfile> {
    matches
        .into_iter()
        .fold(Vec::new(), |profiles, m| fold_match_into_profiles(m, profiles))
}
