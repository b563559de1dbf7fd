//! Database bootstrap: data directory, connection, and schema.

use super::config::Config;
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::fs;
use tracing::{debug, info};

pub struct Db;

impl Db {
    /// Creates the data directory and the `SQLite` schema.
    ///
    /// Safe to run more than once.
    ///
    /// # Errors
    /// Returns error if directory creation, DB opening, or migration fails.
    pub fn init(config: &Config) -> Result<Connection> {
        if !config.data_dir.exists() {
            fs::create_dir_all(&config.data_dir).with_context(|| {
                format!("Failed to create {}", config.data_dir.display())
            })?;
        }

        let db_path = config.db_path();
        let conn = Connection::open(&db_path).context("Failed to open database")?;
        Self::migrate(&conn)?;

        info!(path = %db_path.display(), "repair store initialized");
        Ok(conn)
    }

    /// Connects to an existing database.
    ///
    /// # Errors
    /// Returns error if the database file does not exist or cannot be opened.
    pub fn connect(config: &Config) -> Result<Connection> {
        let db_path = config.db_path();
        if !db_path.exists() {
            bail!("Repair store not initialized. Run `repairtrack init` first.");
        }
        debug!(path = %db_path.display(), "opening repair store");
        Connection::open(db_path).context("Failed to open database")
    }

    /// Opens a throwaway in-memory store with the schema applied.
    ///
    /// # Errors
    /// Returns error if migration fails.
    pub fn in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::migrate(&conn)?;
        Ok(conn)
    }

    /// Applies the schema migrations.
    fn migrate(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS repairs (
                id TEXT PRIMARY KEY,
                booking_reference TEXT UNIQUE NOT NULL,
                device TEXT NOT NULL,
                repair_description TEXT,
                customer_name TEXT,
                quoted_price_pence INTEGER,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                scheduled_date TEXT,
                updated_at TEXT,
                estimated_completion TEXT,
                actual_completion TEXT
            )",
            [],
        )
        .context("Failed to create repairs table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_repairs_status ON repairs (status)",
            [],
        )
        .context("Failed to create status index")?;

        Ok(())
    }
}
