//! Persistence port.
//!
//! RULE: The scoring engine never touches storage. Only the application
//! layer (`engine::ScoringSession`) calls a repository, and it treats every
//! failure as non-authoritative: logged, never rolled back into match state.
//!
//! All values are full-document snapshots keyed by opaque string ids.
//! Writes replace; there is no partial patching.

use crate::{
    error::ScoreResult,
    event::EventLogEntry,
    match_state::Match,
    profile::PlayerProfile,
    tournament::Tournament,
};
use std::any::Any;

pub trait MatchRepository: Send {
    // ── Live matches ──
    fn load_live_matches(&self) -> ScoreResult<Vec<Match>>;
    fn save_live_match(&self, m: &Match) -> ScoreResult<()>;
    fn remove_live_match(&self, match_id: &str) -> ScoreResult<()>;

    // ── Completed matches ──
    fn load_completed_matches(&self) -> ScoreResult<Vec<Match>>;
    fn save_completed_match(&self, m: &Match) -> ScoreResult<()>;

    // ── Player profiles ──
    fn load_player_profiles(&self) -> ScoreResult<Vec<PlayerProfile>>;
    fn save_player_profiles(&self, profiles: &[PlayerProfile]) -> ScoreResult<()>;

    // ── Tournaments ──
    fn load_tournaments(&self) -> ScoreResult<Vec<Tournament>>;
    fn save_tournament(&self, t: &Tournament) -> ScoreResult<()>;
    fn delete_tournament(&self, tournament_id: &str) -> ScoreResult<()>;

    // ── Event log ──
    fn append_event(&self, entry: &EventLogEntry) -> ScoreResult<()>;

    /// For downcasting in tests and tooling only.
    /// Production code never uses this.
    fn as_any(&self) -> &dyn Any;
}
