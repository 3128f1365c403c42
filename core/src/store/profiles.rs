//! Player profile documents.

use super::{decode, MatchStore};
use crate::{error::ScoreResult, profile::PlayerProfile};
use rusqlite::params;

impl MatchStore {
    pub fn player_profiles(&self) -> ScoreResult<Vec<PlayerProfile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM player_profile ORDER BY position ASC")?;
        let docs = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        docs.iter().map(|d| decode(d)).collect()
    }

    /// Replace the whole profile set in one transaction.
    pub fn replace_player_profiles(&self, profiles: &[PlayerProfile]) -> ScoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM player_profile", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO player_profile (name, position, document) VALUES (?1, ?2, ?3)",
            )?;
            for (position, profile) in profiles.iter().enumerate() {
                let document = serde_json::to_string(profile)?;
                stmt.execute(params![profile.name, position as i64, document])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
