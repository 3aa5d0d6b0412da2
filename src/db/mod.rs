//! Database module - SQLite key-value storage for the logbook

pub mod snapshot;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::exercises::Catalog;
use crate::tracker::Tracker;

/// Catalog with embedded histories
pub const KEY_CATALOG: &str = "catalog";
/// ISO week the motivation message was last shown in
pub const KEY_MOTIVATION_WEEK: &str = "motivation_week";

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Fresh database that lives only as long as the value
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load the logbook, seeding the preset catalog on first run
    pub fn load_tracker(&self) -> Result<Tracker> {
        match self.get(KEY_CATALOG)? {
            Some(json) => Ok(snapshot::decode(&json)),
            None => {
                info!("No catalog stored, seeding presets");
                let tracker = Tracker::new(Catalog::presets());
                self.save_tracker(&tracker)?;
                Ok(tracker)
            }
        }
    }

    /// Write the whole logbook snapshot
    pub fn save_tracker(&self, tracker: &Tracker) -> Result<()> {
        let json = snapshot::encode(tracker)?;
        self.set(KEY_CATALOG, &json)?;
        debug!(bytes = json.len(), "catalog saved");
        Ok(())
    }

    pub fn last_motivation_week(&self) -> Result<Option<i64>> {
        Ok(self
            .get(KEY_MOTIVATION_WEEK)?
            .and_then(|v| v.trim().parse().ok()))
    }

    pub fn set_motivation_week(&self, week: i64) -> Result<()> {
        self.set(KEY_MOTIVATION_WEEK, &week.to_string())
    }
}
