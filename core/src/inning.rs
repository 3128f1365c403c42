//! One team's batting effort: aggregate score plus both rosters.

use crate::{
    delivery::DismissalMethod,
    roster::{Bowler, Player, TeamSheetEntry},
    types::{PlayerId, BALLS_PER_OVER, MAX_WICKETS, SQUAD_SIZE},
};
use serde::{Deserialize, Serialize};

/// Monotonic extras counters. Never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
    pub wides:    u32,
    pub no_balls: u32,
    pub byes:     u32,
    pub leg_byes: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

/// Snapshot taken at the moment of a dismissal. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallOfWicket {
    pub score:  u32,
    pub wicket: u32,
    pub batsman_name: String,
    /// "overs.balls" as it stood after the dismissal ball was counted.
    pub over: String,
    pub bowler_name: String,
    pub dismissal_type: DismissalMethod,
    pub fielder_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inning {
    pub batting_team: String,
    pub bowling_team: String,
    pub score:   u32,
    pub wickets: u32,
    pub overs:   u32,
    /// Legal balls in the current over (0–5).
    pub balls:   u32,
    pub batsmen: Vec<Player>,
    pub bowlers: Vec<Bowler>,
    pub extras:  Extras,
    pub fall_of_wickets: Vec<FallOfWicket>,
}

/// Build a fresh inning with one roster slot per squad member on each side.
///
/// Slot `i` takes the `i`-th sheet entry; a missing or blank entry becomes
/// `"<Team> Player <i+1>"`. Role flags are looked up by name in the sheet,
/// so placeholders never inherit them.
pub fn create_inning(
    batting_team: &str,
    bowling_team: &str,
    batting_sheet: &[TeamSheetEntry],
    bowling_sheet: &[TeamSheetEntry],
) -> Inning {
    let batsmen = (0..SQUAD_SIZE)
        .map(|i| {
            let (id, name, photo) = slot_identity(batting_team, batting_sheet, i);
            let mut player = Player::new(id, name, photo);
            if let Some(entry) = lookup(batting_sheet, &player.name) {
                player.is_captain = entry.is_captain;
                player.is_vice_captain = entry.is_vice_captain;
                player.is_wicket_keeper = entry.is_wicket_keeper;
            }
            player
        })
        .collect();

    let bowlers = (0..SQUAD_SIZE)
        .map(|i| {
            let (id, name, photo) = slot_identity(bowling_team, bowling_sheet, i);
            let mut bowler = Bowler::new(id, name, photo);
            if let Some(entry) = lookup(bowling_sheet, &bowler.name) {
                bowler.is_wicket_keeper = entry.is_wicket_keeper;
            }
            bowler
        })
        .collect();

    Inning {
        batting_team: batting_team.to_string(),
        bowling_team: bowling_team.to_string(),
        score: 0,
        wickets: 0,
        overs: 0,
        balls: 0,
        batsmen,
        bowlers,
        extras: Extras::default(),
        fall_of_wickets: Vec::new(),
    }
}

fn slot_identity(
    team: &str,
    sheet: &[TeamSheetEntry],
    index: usize,
) -> (PlayerId, String, Option<String>) {
    let entry = sheet.get(index).filter(|e| !e.name.trim().is_empty());
    let name = match entry {
        Some(e) => e.name.clone(),
        None => format!("{team} Player {}", index + 1),
    };
    let photo = entry.and_then(|e| e.photo.clone());
    (index as PlayerId + 1, name, photo)
}

fn lookup<'a>(sheet: &'a [TeamSheetEntry], name: &str) -> Option<&'a TeamSheetEntry> {
    sheet.iter().find(|e| e.name == name)
}

impl Inning {
    pub fn batsman(&self, id: PlayerId) -> Option<&Player> {
        self.batsmen.iter().find(|p| p.id == id)
    }

    pub fn bowler(&self, id: PlayerId) -> Option<&Bowler> {
        self.bowlers.iter().find(|b| b.id == id)
    }

    pub(crate) fn batsman_index(&self, id: PlayerId) -> Option<usize> {
        self.batsmen.iter().position(|p| p.id == id)
    }

    pub(crate) fn bowler_index(&self, id: PlayerId) -> Option<usize> {
        self.bowlers.iter().position(|b| b.id == id)
    }

    /// Legal balls bowled so far in this inning.
    pub fn legal_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls
    }

    /// "overs.balls", e.g. "12.3".
    pub fn over_marker(&self) -> String {
        format!("{}.{}", self.overs, self.balls)
    }

    pub fn is_all_out(&self) -> bool {
        self.wickets >= MAX_WICKETS
    }

    pub fn not_out_batsmen(&self) -> impl Iterator<Item = &Player> {
        self.batsmen.iter().filter(|p| !p.is_out)
    }

    /// Number of batsmen flagged out. Must always equal `wickets`.
    pub fn dismissed_count(&self) -> u32 {
        self.batsmen.iter().filter(|p| p.is_out).count() as u32
    }
}
