//! Live and completed match documents.

use super::{decode, now, MatchStore};
use crate::{error::ScoreResult, match_state::Match};
use rusqlite::{params, OptionalExtension};

impl MatchStore {
    // ── Live ───────────────────────────────────────────────────

    /// Insert or replace the live document. Keeps the original row order.
    pub fn upsert_live_match(&self, m: &Match) -> ScoreResult<()> {
        let document = serde_json::to_string(m)?;
        self.conn.execute(
            "INSERT INTO live_match (match_id, version, document, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(match_id) DO UPDATE SET
                version = excluded.version,
                document = excluded.document,
                updated_at = excluded.updated_at",
            params![m.id, m.version as i64, document, now()],
        )?;
        Ok(())
    }

    pub fn live_matches(&self) -> ScoreResult<Vec<Match>> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM live_match ORDER BY rowid ASC")?;
        let docs = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        docs.iter().map(|d| decode(d)).collect()
    }

    pub fn live_match(&self, match_id: &str) -> ScoreResult<Option<Match>> {
        let doc: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM live_match WHERE match_id = ?1",
                params![match_id],
                |row| row.get(0),
            )
            .optional()?;
        doc.as_deref().map(decode::<Match>).transpose()
    }

    pub fn delete_live_match(&self, match_id: &str) -> ScoreResult<()> {
        self.conn.execute(
            "DELETE FROM live_match WHERE match_id = ?1",
            params![match_id],
        )?;
        Ok(())
    }

    // ── Completed ──────────────────────────────────────────────

    pub fn upsert_completed_match(&self, m: &Match) -> ScoreResult<()> {
        let document = serde_json::to_string(m)?;
        self.conn.execute(
            "INSERT INTO completed_match (match_id, tournament_id, result, document, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(match_id) DO UPDATE SET
                tournament_id = excluded.tournament_id,
                result = excluded.result,
                document = excluded.document",
            params![m.id, m.tournament_id, m.result().to_string(), document, now()],
        )?;
        Ok(())
    }

    pub fn completed_matches(&self) -> ScoreResult<Vec<Match>> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM completed_match ORDER BY rowid ASC")?;
        let docs = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        docs.iter().map(|d| decode(d)).collect()
    }

    /// Completed matches played under one tournament.
    pub fn completed_matches_for_tournament(&self, tournament_id: &str) -> ScoreResult<Vec<Match>> {
        let mut stmt = self.conn.prepare(
            "SELECT document FROM completed_match
             WHERE tournament_id = ?1 ORDER BY rowid ASC",
        )?;
        let docs = stmt
            .query_map(params![tournament_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        docs.iter().map(|d| decode(d)).collect()
    }

    pub fn completed_match_count(&self) -> ScoreResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM completed_match", [], |row| row.get(0))?;
        Ok(count)
    }
}
