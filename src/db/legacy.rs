//! Upgrade of catalogs that stored each category as its own table.
//!
//! The old layout kept a one-column `category(name)` directory where every
//! name was also the name of a table holding `audio_id` rows. The upgrade
//! moves those rows into `category_member` and drops the per-category
//! tables.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::error::{Result, StatementContext};

const LEGACY_DIRECTORY: &str = "legacy_category_directory";

/// Returns true if `category` exists without a `category_id` column.
pub(super) fn needs_upgrade(conn: &Connection) -> Result<bool> {
    let sql = "SELECT COUNT(*) FROM pragma_table_info('category')";
    let columns: i64 = conn.query_row(sql, [], |row| row.get(0)).with_statement(sql)?;
    if columns == 0 {
        return Ok(false);
    }

    let sql = "SELECT COUNT(*) FROM pragma_table_info('category') WHERE name = 'category_id'";
    let has_id: i64 = conn.query_row(sql, [], |row| row.get(0)).with_statement(sql)?;
    Ok(has_id == 0)
}

/// Moves the legacy directory out of the way so the current schema can be
/// created. Must run before the schema and inside the upgrade transaction.
pub(super) fn set_aside_directory(conn: &Connection) -> Result<()> {
    let sql = format!("ALTER TABLE category RENAME TO {LEGACY_DIRECTORY}");
    debug!(statement = %sql, "setting aside legacy category directory");
    conn.execute(&sql, []).with_statement(&sql)?;
    Ok(())
}

/// Imports every legacy category and its members, then drops the legacy
/// tables. Returns the number of categories imported.
pub(super) fn import_categories(conn: &Connection) -> Result<usize> {
    let sql = format!("SELECT name FROM {LEGACY_DIRECTORY} ORDER BY name");
    let names = {
        let mut stmt = conn.prepare(&sql).with_statement(&sql)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .with_statement(&sql)?;
        rows.collect::<rusqlite::Result<Vec<String>>>()
            .with_statement(&sql)?
    };

    for name in &names {
        let key = crate::models::category_key(name);
        let sql = "INSERT OR IGNORE INTO category (name) VALUES (?1)";
        conn.execute(sql, [&key]).with_statement(sql)?;

        if !table_exists(conn, name)? {
            warn!(category = %name, "legacy category has no table; imported empty");
            continue;
        }

        let table = quote_identifier(name);
        let sql = format!(
            "INSERT OR IGNORE INTO category_member (category_id, audio_id)
             SELECT c.category_id, t.audio_id
             FROM {table} t, category c
             WHERE c.name = ?1
               AND t.audio_id IN (SELECT audio_id FROM hebrew_audio)"
        );
        let moved = conn.execute(&sql, [&key]).with_statement(&sql)?;

        let sql = format!("DROP TABLE {table}");
        conn.execute(&sql, []).with_statement(&sql)?;
        info!(category = %key, members = moved, "imported legacy category");
    }

    let sql = format!("DROP TABLE {LEGACY_DIRECTORY}");
    conn.execute(&sql, []).with_statement(&sql)?;
    Ok(names.len())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let sql = "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)";
    conn.query_row(sql, [name], |row| row.get(0))
        .with_statement(sql)
}

/// Quotes a table name for use in DDL. Legacy category names were
/// user-entered, so they are never spliced in unquoted.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
