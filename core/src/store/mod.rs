//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The application layer calls store methods through `MatchRepository`;
//! the scoring engine never sees it.

use crate::{
    error::ScoreResult,
    event::EventLogEntry,
    match_state::Match,
    profile::PlayerProfile,
    repository::MatchRepository,
    tournament::Tournament,
    types::Version,
};
use rusqlite::{params, Connection};

mod matches;
mod profiles;
mod tournaments;

pub struct MatchStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl MatchStore {
    pub fn open(path: &str) -> ScoreResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ScoreResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ScoreResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_scorebook.sql"))?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> ScoreResult<()> {
        self.conn.execute(
            "INSERT INTO ball_log (match_id, version, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.match_id,
                entry.version as i64,
                entry.event_type,
                entry.payload,
                now(),
            ],
        )?;
        Ok(())
    }

    pub fn events_for_match(&self, match_id: &str) -> ScoreResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, match_id, version, event_type, payload
             FROM ball_log WHERE match_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![match_id], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    match_id: row.get(1)?,
                    version: row.get::<_, i64>(2)? as Version,
                    event_type: row.get(3)?,
                    payload: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, match_id: &str, event_type: &str) -> ScoreResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM ball_log WHERE match_id = ?1 AND event_type = ?2",
            params![match_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Decode one JSON document column.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(json: &str) -> ScoreResult<T> {
    serde_json::from_str(json).map_err(Into::into)
}

impl MatchRepository for MatchStore {
    fn load_live_matches(&self) -> ScoreResult<Vec<Match>> {
        self.live_matches()
    }

    fn save_live_match(&self, m: &Match) -> ScoreResult<()> {
        self.upsert_live_match(m)
    }

    fn remove_live_match(&self, match_id: &str) -> ScoreResult<()> {
        self.delete_live_match(match_id)
    }

    fn load_completed_matches(&self) -> ScoreResult<Vec<Match>> {
        self.completed_matches()
    }

    fn save_completed_match(&self, m: &Match) -> ScoreResult<()> {
        self.upsert_completed_match(m)
    }

    fn load_player_profiles(&self) -> ScoreResult<Vec<PlayerProfile>> {
        self.player_profiles()
    }

    fn save_player_profiles(&self, profiles: &[PlayerProfile]) -> ScoreResult<()> {
        self.replace_player_profiles(profiles)
    }

    fn load_tournaments(&self) -> ScoreResult<Vec<Tournament>> {
        self.tournaments()
    }

    fn save_tournament(&self, t: &Tournament) -> ScoreResult<()> {
        self.upsert_tournament(t)
    }

    fn delete_tournament(&self, tournament_id: &str) -> ScoreResult<()> {
        self.remove_tournament(tournament_id)
    }

    fn append_event(&self, entry: &EventLogEntry) -> ScoreResult<()> {
        MatchStore::append_event(self, entry)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
