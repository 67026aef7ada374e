// SQLite persistence for the draft log.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::draft::pick::DraftPick;
use crate::draft::player::Position;

/// SQLite-backed draft log plus a key-value store for session state.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_picks (
                pick_number INTEGER NOT NULL,
                round       INTEGER NOT NULL,
                team_number INTEGER NOT NULL,
                player_name TEXT NOT NULL,
                position    TEXT NOT NULL,
                draft_id    TEXT NOT NULL,
                timestamp   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (pick_number, draft_id)
            );

            CREATE INDEX IF NOT EXISTS idx_draft_picks_draft_id ON draft_picks(draft_id);

            CREATE TABLE IF NOT EXISTS session_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Panics if the mutex is poisoned, which only happens after another
    /// thread panicked while holding it.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Record a pick. A row already stored under the same pick number is
    /// replaced, so the log always holds the latest pick for each slot.
    pub fn record_pick(&self, pick: &DraftPick, draft_id: &str) -> Result<()> {
        let conn = self.conn();
        Self::insert_pick(&conn, pick, draft_id)
    }

    fn insert_pick(conn: &Connection, pick: &DraftPick, draft_id: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO draft_picks
                (pick_number, round, team_number, player_name, position, draft_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(pick_number, draft_id) DO UPDATE SET
                round = excluded.round,
                team_number = excluded.team_number,
                player_name = excluded.player_name,
                position = excluded.position,
                timestamp = excluded.timestamp",
            params![
                pick.pick_number,
                pick.round,
                pick.team_number,
                pick.player_name,
                pick.position.display_str(),
                draft_id,
            ],
        )
        .with_context(|| format!("failed to record pick {}", pick.pick_number))?;
        Ok(())
    }

    /// Replace the whole stored log of one draft with `picks`, atomically.
    pub fn replace_picks(&self, draft_id: &str, picks: &[DraftPick]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM draft_picks WHERE draft_id = ?1", params![draft_id])
            .context("failed to clear stored picks")?;
        for pick in picks {
            Self::insert_pick(&tx, pick, draft_id)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Remove one pick, e.g. after an undo. Returns whether a row existed.
    pub fn delete_pick(&self, pick_number: u32, draft_id: &str) -> Result<bool> {
        let conn = self.conn();
        let deleted = conn
            .execute(
                "DELETE FROM draft_picks WHERE pick_number = ?1 AND draft_id = ?2",
                params![pick_number, draft_id],
            )
            .context("failed to delete draft pick")?;
        Ok(deleted > 0)
    }

    /// Load the picks of one draft, ordered by pick number.
    pub fn load_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT pick_number, round, team_number, player_name, position
                 FROM draft_picks WHERE draft_id = ?1 ORDER BY pick_number",
            )
            .context("failed to prepare pick query")?;

        let rows = stmt
            .query_map(params![draft_id], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .context("failed to query draft picks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to read pick row")?;

        rows.into_iter()
            .map(|(pick_number, round, team_number, player_name, position)| {
                let position = Position::from_str_pos(&position).ok_or_else(|| {
                    anyhow!("pick {pick_number} has unknown position '{position}'")
                })?;
                Ok(DraftPick {
                    pick_number,
                    round,
                    team_number,
                    player_name,
                    position,
                })
            })
            .collect()
    }

    /// Persist an arbitrary JSON value under `key`, replacing any previous
    /// value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let text = serde_json::to_string(value)?;
        conn.execute(
            "INSERT INTO session_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, text],
        )
        .with_context(|| format!("failed to write session state '{key}'"))?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM session_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read session state '{key}'"))?;

        stored
            .map(|text| {
                serde_json::from_str(&text)
                    .with_context(|| format!("session state '{key}' is not valid JSON"))
            })
            .transpose()
    }

    /// Whether any pick has been stored for `draft_id`.
    pub fn has_draft_in_progress(&self, draft_id: &str) -> Result<bool> {
        Ok(self.pick_count(draft_id)? > 0)
    }

    pub fn pick_count(&self, draft_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: u32 = conn
            .query_row(
                "SELECT COUNT(pick_number) FROM draft_picks WHERE draft_id = ?1",
                params![draft_id],
                |row| row.get(0),
            )
            .with_context(|| format!("failed to count picks for {draft_id}"))?;
        Ok(count as usize)
    }

    /// Delete every draft and all session state.
    pub fn clear_draft(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute_batch("DELETE FROM draft_picks; DELETE FROM session_state;")
            .context("failed to clear stored drafts")?;
        tx.commit()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Draft ID and team names
    // ------------------------------------------------------------------

    const ACTIVE_DRAFT_KEY: &str = "active_draft_id";

    pub fn get_draft_id(&self) -> Result<Option<String>> {
        Ok(self
            .load_state(Self::ACTIVE_DRAFT_KEY)?
            .and_then(|v| v.as_str().map(str::to_owned)))
    }

    pub fn set_draft_id(&self, draft_id: &str) -> Result<()> {
        self.save_state(Self::ACTIVE_DRAFT_KEY, &serde_json::Value::from(draft_id))
    }

    /// New draft ID from the current UTC time, e.g. `draft_20260228_143022_123`.
    pub fn generate_draft_id() -> String {
        chrono::Utc::now().format("draft_%Y%m%d_%H%M%S_%3f").to_string()
    }

    fn team_names_key(draft_id: &str) -> String {
        format!("team_names:{draft_id}")
    }

    /// Store operator-assigned team names (index 0 is team 1).
    pub fn save_team_names(&self, draft_id: &str, names: &[String]) -> Result<()> {
        let value = serde_json::to_value(names).context("failed to serialize team names")?;
        self.save_state(&Self::team_names_key(draft_id), &value)
    }

    pub fn load_team_names(&self, draft_id: &str) -> Result<Vec<String>> {
        match self.load_state(&Self::team_names_key(draft_id))? {
            Some(value) => {
                serde_json::from_value(value).context("failed to deserialize team names")
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_DRAFT_ID: &str = "draft_20260905_180000_000";

    fn memory_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    fn sample_pick(pick_number: u32) -> DraftPick {
        DraftPick {
            pick_number,
            round: 1,
            team_number: pick_number,
            player_name: format!("Player {pick_number}"),
            position: Position::WideReceiver,
        }
    }

    #[test]
    fn open_creates_schema() {
        let db = memory_db();
        let conn = db.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tables, vec!["draft_picks".to_string(), "session_state".to_string()]);
    }

    #[test]
    fn record_and_load_picks_in_order() {
        let db = memory_db();
        let tight_end = DraftPick {
            position: Position::TightEnd,
            ..sample_pick(2)
        };
        db.record_pick(&tight_end, TEST_DRAFT_ID).unwrap();
        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();

        let picks = db.load_picks(TEST_DRAFT_ID).unwrap();
        assert_eq!(picks, vec![sample_pick(1), tight_end]);
    }

    #[test]
    fn rerecording_a_pick_keeps_latest_row() {
        let db = memory_db();
        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();
        let replacement = DraftPick {
            player_name: "Someone Else".into(),
            ..sample_pick(1)
        };
        db.record_pick(&replacement, TEST_DRAFT_ID).unwrap();

        assert_eq!(db.pick_count(TEST_DRAFT_ID).unwrap(), 1);
        assert_eq!(db.load_picks(TEST_DRAFT_ID).unwrap(), vec![replacement]);
    }

    #[test]
    fn replace_picks_rewrites_one_draft() {
        let db = memory_db();
        for n in 1..=3 {
            db.record_pick(&sample_pick(n), TEST_DRAFT_ID).unwrap();
        }
        db.record_pick(&sample_pick(1), "other_draft").unwrap();

        db.replace_picks(TEST_DRAFT_ID, &[sample_pick(1)]).unwrap();

        assert_eq!(db.load_picks(TEST_DRAFT_ID).unwrap(), vec![sample_pick(1)]);
        assert_eq!(db.pick_count("other_draft").unwrap(), 1);
    }

    #[test]
    fn delete_pick_removes_only_that_pick() {
        let db = memory_db();
        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();
        db.record_pick(&sample_pick(2), TEST_DRAFT_ID).unwrap();
        db.record_pick(&sample_pick(2), "other_draft").unwrap();

        assert!(db.delete_pick(2, TEST_DRAFT_ID).unwrap());
        assert!(!db.delete_pick(2, TEST_DRAFT_ID).unwrap());
        assert_eq!(db.pick_count(TEST_DRAFT_ID).unwrap(), 1);
        assert_eq!(db.pick_count("other_draft").unwrap(), 1);
    }

    #[test]
    fn unknown_position_is_an_error() {
        let db = memory_db();
        db.conn()
            .execute(
                "INSERT INTO draft_picks (pick_number, round, team_number, player_name, position, draft_id)
                 VALUES (1, 1, 1, 'Somebody', 'LB', ?1)",
                params![TEST_DRAFT_ID],
            )
            .unwrap();
        assert!(db.load_picks(TEST_DRAFT_ID).is_err());
    }

    #[test]
    fn picks_are_kept_per_draft() {
        let db = memory_db();
        db.record_pick(&sample_pick(1), "draft_a").unwrap();
        db.record_pick(&sample_pick(2), "draft_a").unwrap();
        db.record_pick(&sample_pick(1), "draft_b").unwrap();

        assert_eq!(db.load_picks("draft_a").unwrap().len(), 2);
        assert_eq!(db.load_picks("draft_b").unwrap().len(), 1);
        assert!(db.has_draft_in_progress("draft_a").unwrap());
        assert!(!db.has_draft_in_progress("draft_c").unwrap());
    }

    #[test]
    fn state_values_are_replaced() {
        let db = memory_db();
        assert!(db.load_state("key").unwrap().is_none());
        db.save_state("key", &json!(1)).unwrap();
        db.save_state("key", &json!({"a": [1, 2]})).unwrap();
        assert_eq!(db.load_state("key").unwrap(), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn clear_draft_forgets_everything() {
        let db = memory_db();
        db.record_pick(&sample_pick(1), TEST_DRAFT_ID).unwrap();
        db.set_draft_id(TEST_DRAFT_ID).unwrap();

        db.clear_draft().unwrap();

        assert!(!db.has_draft_in_progress(TEST_DRAFT_ID).unwrap());
        assert!(db.get_draft_id().unwrap().is_none());
    }

    #[test]
    fn active_draft_id_round_trips() {
        let db = memory_db();
        assert!(db.get_draft_id().unwrap().is_none());
        db.set_draft_id("draft_20260901_190000_001").unwrap();
        assert_eq!(
            db.get_draft_id().unwrap(),
            Some("draft_20260901_190000_001".to_string())
        );
    }

    #[test]
    fn generated_ids_are_timestamped() {
        let id = Database::generate_draft_id();
        assert!(id.starts_with("draft_"), "unexpected draft id: {id}");
        assert_eq!(id.len(), "draft_YYYYMMDD_HHMMSS_mmm".len());
    }

    #[test]
    fn team_names_round_trip_per_draft() {
        let db = memory_db();
        assert!(db.load_team_names(TEST_DRAFT_ID).unwrap().is_empty());

        let names = vec!["Team 1".to_string(), "Gridiron Gang".to_string()];
        db.save_team_names(TEST_DRAFT_ID, &names).unwrap();
        assert_eq!(db.load_team_names(TEST_DRAFT_ID).unwrap(), names);
        assert!(db.load_team_names("another").unwrap().is_empty());
    }
}
