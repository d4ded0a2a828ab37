mod legacy;
mod schema;

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{CatalogError, Result, StatementContext};
use crate::normalizer::strip_niqqud;
use schema::INITIAL_SCHEMA;

/// Database wrapper providing connection management and schema initialization.
///
/// One `Database` owns the single connection of the process; services
/// borrow it rather than opening their own.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| CatalogError::Open {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist. Catalogs written
    /// with per-category tables are upgraded in place, and any stored
    /// `hebrew_no_niqqud` that no longer matches its `hebrew` is rewritten.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Enables foreign keys, upgrades a legacy category layout if one is
    /// found, creates missing tables, then resyncs derived Hebrew text.
    fn initialize_schema(&self) -> Result<()> {
        let sql = "PRAGMA foreign_keys = ON";
        self.conn.execute(sql, []).with_statement(sql)?;

        if legacy::needs_upgrade(&self.conn)? {
            self.in_transaction(|conn| {
                legacy::set_aside_directory(conn)?;
                conn.execute_batch(INITIAL_SCHEMA)
                    .with_statement(INITIAL_SCHEMA)?;
                let imported = legacy::import_categories(conn)?;
                info!(categories = imported, "upgraded legacy category tables");
                Ok(())
            })?;
        } else {
            self.conn
                .execute_batch(INITIAL_SCHEMA)
                .with_statement(INITIAL_SCHEMA)?;
        }

        self.resync_derived_text()?;
        Ok(())
    }

    /// Rewrites `hebrew_no_niqqud` wherever it differs from
    /// `strip_niqqud(hebrew)`. Returns the number of rows repaired.
    fn resync_derived_text(&self) -> Result<usize> {
        let sql = "SELECT audio_id, hebrew, hebrew_no_niqqud FROM hebrew_audio";
        let stale: Vec<(i64, String)> = {
            let mut stmt = self.conn.prepare(sql).with_statement(sql)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                })
                .with_statement(sql)?;

            let mut stale = Vec::new();
            for row in rows {
                let (id, hebrew, stored) = row.with_statement(sql)?;
                let derived = strip_niqqud(&hebrew);
                if stored.as_deref() != Some(derived.as_str()) {
                    stale.push((id, derived));
                }
            }
            stale
        };

        if stale.is_empty() {
            return Ok(0);
        }

        self.in_transaction(|conn| {
            let sql = "UPDATE hebrew_audio SET hebrew_no_niqqud = ?1 WHERE audio_id = ?2";
            for (id, derived) in &stale {
                conn.execute(sql, (derived, id)).with_statement(sql)?;
            }
            Ok(())
        })?;
        info!(rows = stale.len(), "resynced hebrew_no_niqqud");
        Ok(stale.len())
    }

    /// Runs `f` inside a transaction, committing on success and rolling
    /// back on error.
    ///
    /// Helpers called from `f` take the `&Connection` they are given, so
    /// transactions never nest.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = &self.conn;
        conn.execute("BEGIN TRANSACTION", [])
            .with_statement("BEGIN TRANSACTION")?;
        debug!("transaction started");

        match f(conn) {
            Ok(value) => {
                conn.execute("COMMIT", []).with_statement("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                // Report the original failure even if the rollback fails too
                let _ = conn.execute("ROLLBACK", []);
                debug!(error = %e, "transaction rolled back");
                Err(e)
            }
        }
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
