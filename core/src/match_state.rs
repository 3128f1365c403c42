//! The match document: two innings, toss, crease selection and result.
//!
//! RULE: Every transition borrows the current `Match` and returns a new one.
//! A rejected transition leaves the caller's value untouched.

use crate::{
    error::{ScoreError, ScoreResult},
    event::LastEvent,
    inning::{create_inning, Inning},
    roster::TeamSheetEntry,
    toss::{Toss, TossDecision},
    types::{MatchId, PlayerId, SelectionSlot, Version, BALLS_PER_OVER, MAX_WICKETS, SQUAD_SIZE},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything entered on the setup screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSetup {
    pub team_a: String,
    pub team_b: String,
    pub overs:  u32,
    #[serde(default)]
    pub team_a_players: Vec<TeamSheetEntry>,
    #[serde(default)]
    pub team_b_players: Vec<TeamSheetEntry>,
    #[serde(default)]
    pub team_a_logo: Option<String>,
    #[serde(default)]
    pub team_b_logo: Option<String>,
    #[serde(default)]
    pub tournament_id: Option<String>,
}

impl MatchSetup {
    pub fn validate(&self) -> ScoreResult<()> {
        let invalid = |reason: String| Err(ScoreError::InvalidSetup { reason });
        if self.team_a.trim().is_empty() || self.team_b.trim().is_empty() {
            return invalid("both teams need a name".into());
        }
        if self.team_a == self.team_b {
            return invalid(format!("'{}' cannot play itself", self.team_a));
        }
        if self.overs == 0 {
            return invalid("a match needs at least one over".into());
        }
        for (team, sheet) in [(&self.team_a, &self.team_a_players), (&self.team_b, &self.team_b_players)] {
            if sheet.len() > SQUAD_SIZE {
                return invalid(format!("{team} lists {} players (max {SQUAD_SIZE})", sheet.len()));
            }
            let roles: [(&str, fn(&TeamSheetEntry) -> bool); 3] = [
                ("captain", |p| p.is_captain),
                ("vice-captain", |p| p.is_vice_captain),
                ("wicket-keeper", |p| p.is_wicket_keeper),
            ];
            for (role, has_role) in roles {
                if sheet.iter().filter(|p| has_role(p)).count() > 1 {
                    return invalid(format!("{team} has more than one {role}"));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    AwaitingToss,
    InProgress,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManOfTheMatch {
    pub name:      String,
    pub photo:     Option<String>,
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    Incomplete,
    WonByWickets { team: String, wickets: u32 },
    WonByRuns { team: String, runs: u32 },
    Tied,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete => f.write_str("Match Incomplete"),
            Self::WonByWickets { team, wickets } => write!(f, "{team} won by {wickets} wickets"),
            Self::WonByRuns { team, runs } => write!(f, "{team} won by {runs} runs"),
            Self::Tied => f.write_str("Match Tied"),
        }
    }
}

/// A player's combined figures across both innings, for the award screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MotmCandidate {
    pub name:      String,
    pub photo:     Option<String>,
    pub team_name: String,
    /// (runs, balls)
    pub batting: Option<(u32, u32)>,
    /// (wickets, runs conceded)
    pub bowling: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id:      MatchId,
    pub version: Version,
    pub status:  MatchStatus,
    pub team_a:  String,
    pub team_b:  String,
    pub team_a_logo: Option<String>,
    pub team_b_logo: Option<String>,
    /// Agreed overs per inning.
    pub overs: u32,
    pub team_a_players: Vec<TeamSheetEntry>,
    pub team_b_players: Vec<TeamSheetEntry>,
    pub toss:    Option<Toss>,
    pub innings: Vec<Inning>,
    pub current_inning: usize,
    // Crease selection, by roster id into the current inning.
    pub striker:     Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler:      Option<PlayerId>,
    /// 0 until the first inning ends.
    pub target: u32,
    pub is_free_hit: bool,
    pub last_event:  Option<LastEvent>,
    pub man_of_the_match: Option<ManOfTheMatch>,
    pub tournament_id: Option<String>,
}

impl Match {
    /// Create a match awaiting its toss.
    pub fn new(setup: MatchSetup) -> ScoreResult<Self> {
        setup.validate()?;
        Ok(Self {
            id: format!("match_{}", uuid::Uuid::new_v4().simple()),
            version: 0,
            status: MatchStatus::AwaitingToss,
            team_a: setup.team_a,
            team_b: setup.team_b,
            team_a_logo: setup.team_a_logo,
            team_b_logo: setup.team_b_logo,
            overs: setup.overs,
            team_a_players: setup.team_a_players,
            team_b_players: setup.team_b_players,
            toss: None,
            innings: Vec::new(),
            current_inning: 0,
            striker: None,
            non_striker: None,
            bowler: None,
            target: 0,
            is_free_hit: false,
            last_event: None,
            man_of_the_match: None,
            tournament_id: setup.tournament_id,
        })
    }

    pub fn sheet_for(&self, team: &str) -> &[TeamSheetEntry] {
        if team == self.team_a {
            &self.team_a_players
        } else {
            &self.team_b_players
        }
    }

    pub fn opponent_of(&self, team: &str) -> &str {
        if team == self.team_a {
            &self.team_b
        } else {
            &self.team_a
        }
    }

    /// Build an inning for `batting_team` from both stored team sheets.
    pub fn build_inning(&self, batting_team: &str) -> Inning {
        let bowling_team = self.opponent_of(batting_team);
        create_inning(
            batting_team,
            bowling_team,
            self.sheet_for(batting_team),
            self.sheet_for(bowling_team),
        )
    }

    /// Record the toss and open the first inning.
    pub fn resolve_toss(&self, winner: &str, decision: TossDecision) -> ScoreResult<Match> {
        if self.status != MatchStatus::AwaitingToss {
            return Err(ScoreError::MatchAlreadyStarted);
        }
        if winner != self.team_a && winner != self.team_b {
            return Err(ScoreError::InvalidToss { team: winner.to_string() });
        }
        let toss = Toss { winner: winner.to_string(), decision };
        let (batting, _) = toss.sides(&self.team_a, &self.team_b);

        let mut next = self.clone();
        next.innings = vec![self.build_inning(batting)];
        next.current_inning = 0;
        next.toss = Some(toss);
        next.status = MatchStatus::InProgress;
        next.striker = None;
        next.non_striker = None;
        next.bowler = None;
        next.version += 1;
        Ok(next)
    }

    pub fn current_inning(&self) -> Option<&Inning> {
        self.innings.get(self.current_inning)
    }

    pub fn first_inning(&self) -> Option<&Inning> {
        self.innings.first()
    }

    pub fn second_inning(&self) -> Option<&Inning> {
        self.innings.get(1)
    }

    pub fn is_chasing(&self) -> bool {
        self.current_inning == 1
    }

    /// Next slot the scorer must fill, in prompt order.
    pub fn pending_selection(&self) -> Option<SelectionSlot> {
        if self.status != MatchStatus::InProgress {
            return None;
        }
        if self.striker.is_none() {
            Some(SelectionSlot::Striker)
        } else if self.non_striker.is_none() {
            Some(SelectionSlot::NonStriker)
        } else if self.bowler.is_none() {
            Some(SelectionSlot::Bowler)
        } else {
            None
        }
    }

    /// Not-out batsmen who may be sent to the crease for `slot`.
    pub fn available_batsmen(&self, slot: SelectionSlot) -> Vec<PlayerId> {
        let other = match slot {
            SelectionSlot::Striker => self.non_striker,
            SelectionSlot::NonStriker => self.striker,
            SelectionSlot::Bowler => return Vec::new(),
        };
        self.current_inning()
            .map(|inning| {
                inning
                    .not_out_batsmen()
                    .filter(|p| Some(p.id) != other)
                    .map(|p| p.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Any bowler may bowl any over, including consecutive ones.
    pub fn available_bowlers(&self) -> Vec<PlayerId> {
        self.current_inning()
            .map(|inning| inning.bowlers.iter().map(|b| b.id).collect())
            .unwrap_or_default()
    }

    /// Fill one crease slot for the current inning.
    pub fn select_player(&self, slot: SelectionSlot, player_id: PlayerId) -> ScoreResult<Match> {
        match self.status {
            MatchStatus::AwaitingToss => return Err(ScoreError::MatchNotStarted),
            MatchStatus::Complete => return Err(ScoreError::MatchComplete),
            MatchStatus::InProgress => {}
        }
        let inning = self.current_inning().ok_or(ScoreError::MatchNotStarted)?;

        let mut next = self.clone();
        match slot {
            SelectionSlot::Striker | SelectionSlot::NonStriker => {
                let batsman = inning
                    .batsman(player_id)
                    .ok_or(ScoreError::PlayerNotFound { slot, player_id })?;
                if batsman.is_out {
                    return Err(ScoreError::PlayerAlreadyOut { player_id });
                }
                let (target, partner) = match slot {
                    SelectionSlot::Striker => (&mut next.striker, self.non_striker),
                    _ => (&mut next.non_striker, self.striker),
                };
                if partner == Some(player_id) {
                    return Err(ScoreError::PlayerAlreadySelected { player_id });
                }
                *target = Some(player_id);
            }
            SelectionSlot::Bowler => {
                inning
                    .bowler(player_id)
                    .ok_or(ScoreError::PlayerNotFound { slot, player_id })?;
                if let Some(current) = self.bowler {
                    if inning.balls > 0 && current != player_id {
                        return Err(ScoreError::OverInProgress { bowler_id: current });
                    }
                }
                next.bowler = Some(player_id);
            }
        }
        next.version += 1;
        Ok(next)
    }

    /// Legal balls left in the current inning.
    pub fn balls_remaining(&self) -> u32 {
        let bowled = self.current_inning().map_or(0, Inning::legal_balls);
        (self.overs * BALLS_PER_OVER).saturating_sub(bowled)
    }

    pub fn result(&self) -> MatchResult {
        let (Some(first), Some(second)) = (self.first_inning(), self.second_inning()) else {
            return MatchResult::Incomplete;
        };
        if second.score >= self.target {
            MatchResult::WonByWickets {
                team: second.batting_team.clone(),
                wickets: MAX_WICKETS.saturating_sub(second.wickets),
            }
        } else if self.status != MatchStatus::Complete {
            MatchResult::Incomplete
        } else if first.score > second.score {
            MatchResult::WonByRuns {
                team: first.batting_team.clone(),
                runs: first.score - second.score,
            }
        } else {
            MatchResult::Tied
        }
    }

    /// Every participant's figures, merged by name across both innings.
    pub fn motm_candidates(&self) -> Vec<MotmCandidate> {
        let mut out: Vec<MotmCandidate> = Vec::new();
        for inning in &self.innings {
            for p in &inning.batsmen {
                let i = candidate_slot(&mut out, &p.name, &p.photo, &inning.batting_team);
                out[i].batting = Some((p.runs, p.balls));
            }
            for b in &inning.bowlers {
                let i = candidate_slot(&mut out, &b.name, &b.photo, &inning.bowling_team);
                out[i].bowling = Some((b.wickets, b.runs_conceded));
            }
        }
        out
    }

    /// Record the award. Only allowed once the match is complete.
    pub fn award_man_of_the_match(&self, name: &str) -> ScoreResult<Match> {
        if self.status != MatchStatus::Complete {
            return Err(ScoreError::MatchNotComplete);
        }
        let candidate = self
            .motm_candidates()
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ScoreError::UnknownPlayer { name: name.to_string() })?;
        let mut next = self.clone();
        next.man_of_the_match = Some(ManOfTheMatch {
            name: candidate.name,
            photo: candidate.photo,
            team_name: candidate.team_name,
        });
        next.version += 1;
        Ok(next)
    }
}

fn candidate_slot(
    out: &mut Vec<MotmCandidate>,
    name: &str,
    photo: &Option<String>,
    team: &str,
) -> usize {
    if let Some(i) = out.iter().position(|c| c.name == name) {
        if photo.is_some() {
            out[i].photo = photo.clone();
        }
        return i;
    }
    out.push(MotmCandidate {
        name: name.to_string(),
        photo: photo.clone(),
        team_name: team.to_string(),
        batting: None,
        bowling: None,
    });
    out.len() - 1
}
