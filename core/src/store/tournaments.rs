//! Tournament records.

use super::MatchStore;
use crate::{error::ScoreResult, tournament::Tournament};
use rusqlite::params;

impl MatchStore {
    pub fn upsert_tournament(&self, t: &Tournament) -> ScoreResult<()> {
        self.conn.execute(
            "INSERT INTO tournament (tournament_id, name, description, stage)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(tournament_id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                stage = excluded.stage",
            params![t.id, t.name, t.description, t.stage],
        )?;
        Ok(())
    }

    pub fn tournaments(&self) -> ScoreResult<Vec<Tournament>> {
        let mut stmt = self.conn.prepare(
            "SELECT tournament_id, name, description, stage
             FROM tournament ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Tournament {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    stage: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn remove_tournament(&self, tournament_id: &str) -> ScoreResult<()> {
        self.conn.execute(
            "DELETE FROM tournament WHERE tournament_id = ?1",
            params![tournament_id],
        )?;
        Ok(())
    }
}
