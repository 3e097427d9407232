// ═══════════════════════════════════════════════════════════════════════
// Session Store — SQLite storage for live game sessions and match history
//
// Each session is one row holding its GameState as JSON. Every action
// is a read-modify-write of that row inside an IMMEDIATE transaction,
// so two writers on the same database never interleave on one session.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::SessionError;
use crate::runner::{GameResult, Table};
use palisade_engine::engine::{apply_action, Action};
use palisade_engine::protocol::decode_intent;
use palisade_engine::{GameState, Outcome};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info};

pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: &str) -> Result<Self, SessionError> {
        let store = SessionStore { conn: Connection::open(path)? };
        store.create_schema()?;
        Ok(store)
    }

    /// In-memory store (useful for tests).
    pub fn in_memory() -> Result<Self, SessionError> {
        let store = SessionStore { conn: Connection::open_in_memory()? };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<(), SessionError> {
        self.conn.execute_batch("
            CREATE TABLE IF NOT EXISTS sessions (
                id          TEXT PRIMARY KEY,
                state       TEXT NOT NULL,
                updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS results (
                id          INTEGER PRIMARY KEY,
                session_id  TEXT NOT NULL,
                seed        TEXT,
                winner      TEXT,
                winner_name TEXT,
                decisions   INTEGER NOT NULL,
                scores      TEXT NOT NULL,
                played_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );
        ")?;
        Ok(())
    }

    // ── Sessions ───────────────────────────────────────────────────────

    /// Insert or overwrite a session.
    pub fn save(&self, id: &str, state: &GameState) -> Result<(), SessionError> {
        write_state(&self.conn, id, state)
    }

    pub fn load(&self, id: &str) -> Result<GameState, SessionError> {
        read_state(&self.conn, id)
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, SessionError> {
        let removed = self.conn.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    pub fn session_ids(&self) -> Result<Vec<String>, SessionError> {
        let mut stmt = self.conn.prepare("SELECT id FROM sessions ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// Load, apply and save as one atomic step. Ignored actions leave the
    /// stored row untouched.
    pub fn apply(&mut self, id: &str, action: Action) -> Result<Outcome, SessionError> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut state = read_state(&tx, id)?;
        let outcome = apply_action(&mut state, action)?;
        if outcome.is_applied() {
            write_state(&tx, id, &state)?;
        }
        tx.commit()?;
        Ok(outcome)
    }

    /// Decode a raw client message and apply it to a session.
    pub fn apply_intent(&mut self, id: &str, json: &str) -> Result<Outcome, SessionError> {
        let intent = decode_intent(json)?;
        let action = intent.into_action(&self.load(id)?.board)?;
        self.apply(id, action)
    }

    /// Borrow one session as a `Table` an agent loop can drive.
    pub fn session(&mut self, id: impl Into<String>) -> StoredSession<'_> {
        StoredSession { store: self, id: id.into() }
    }

    // ── Match history ──────────────────────────────────────────────────

    pub fn record_result(&self, session_id: &str, result: &GameResult) -> Result<i64, SessionError> {
        self.conn.execute(
            "INSERT INTO results (session_id, seed, winner, winner_name, decisions, scores)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session_id,
                result.seed.map(|s| s.to_string()),
                result.winner.as_ref().map(|w| w.to_string()),
                result.winner_name,
                result.decisions as i64,
                serde_json::to_string(&result.scores)?,
            ],
        )?;
        let row = self.conn.last_insert_rowid();
        info!(session = session_id, winner = ?result.winner_name, "result recorded");
        Ok(row)
    }

    /// Wins per winner display name, most wins first. Games nobody won are not counted.
    pub fn win_counts(&self) -> Result<Vec<(String, u32)>, SessionError> {
        let mut stmt = self.conn.prepare(
            "SELECT winner_name, COUNT(*) FROM results
             WHERE winner_name IS NOT NULL
             GROUP BY winner_name
             ORDER BY COUNT(*) DESC, winner_name",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// Get total number of results stored.
    pub fn result_count(&self) -> Result<u32, SessionError> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?)
    }
}

fn read_state(conn: &Connection, id: &str) -> Result<GameState, SessionError> {
    let blob: Option<String> = conn
        .query_row("SELECT state FROM sessions WHERE id = ?1", params![id], |row| row.get(0))
        .optional()?;
    let blob = blob.ok_or_else(|| SessionError::NotFound(id.to_string()))?;
    Ok(serde_json::from_str(&blob)?)
}

fn write_state(conn: &Connection, id: &str, state: &GameState) -> Result<(), SessionError> {
    conn.execute(
        "INSERT INTO sessions (id, state) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET state = excluded.state, updated_at = datetime('now')",
        params![id, serde_json::to_string(state)?],
    )?;
    debug!(session = id, phase = ?state.phase, "session saved");
    Ok(())
}

/// One stored session, driven action by action through the store.
pub struct StoredSession<'a> {
    store: &'a mut SessionStore,
    id: String,
}

impl Table for StoredSession<'_> {
    fn snapshot(&self) -> Result<GameState, SessionError> {
        self.store.load(&self.id)
    }

    fn submit(&mut self, action: Action) -> Result<Outcome, SessionError> {
        self.store.apply(&self.id, action)
    }
}
