//! Error taxonomy for catalog operations.
//!
//! Only genuine failures live here. Informational outcomes such as an
//! already-present category member or an unnecessary removal are returned
//! as values (see [`crate::MembershipChange`] and [`crate::Removal`]).

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the catalog library.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required text field was empty or contained neither an ASCII
    /// alphanumeric nor a Hebrew character.
    #[error("{field} must contain English or Hebrew text")]
    Validation { field: &'static str },

    /// The addressed record does not exist.
    #[error("{entity} with id {id} does not exist")]
    NotFound { entity: &'static str, id: i64 },

    /// The database file could not be opened.
    #[error("cannot open database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The underlying SQLite statement failed.
    #[error("SQL error: {source}\nIn SQL statement:\n {statement}")]
    Store {
        statement: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl CatalogError {
    /// Creates a validation error for the named field.
    pub fn validation(field: &'static str) -> Self {
        Self::Validation { field }
    }

    /// Returns true for errors caused by user input rather than the store.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }

    /// Returns true if the store rejected a write because of a UNIQUE or
    /// PRIMARY KEY constraint.
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            Self::Store {
                source: rusqlite::Error::SqliteFailure(err, _),
                ..
            } => matches!(
                err.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            ),
            _ => false,
        }
    }
}

/// Convenience alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Attaches the failing statement text to a `rusqlite` error.
pub trait StatementContext<T> {
    fn with_statement(self, statement: &str) -> Result<T>;
}

impl<T> StatementContext<T> for rusqlite::Result<T> {
    fn with_statement(self, statement: &str) -> Result<T> {
        self.map_err(|source| CatalogError::Store {
            statement: statement.trim().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_user_error() {
        let err = CatalogError::validation("english");
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "english must contain English or Hebrew text");
    }

    #[test]
    fn store_error_carries_statement_text() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn
            .execute("SELECT * FROM missing_table", [])
            .with_statement("SELECT * FROM missing_table")
            .unwrap_err();

        assert!(!err.is_user_error());
        let message = err.to_string();
        assert!(message.contains("missing_table"));
        assert!(message.contains("In SQL statement"));
    }

    #[test]
    fn duplicate_primary_key_is_detected() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER NOT NULL, v INTEGER NOT NULL, PRIMARY KEY (id, v))")
            .unwrap();
        conn.execute("INSERT INTO t VALUES (1, 1)", []).unwrap();

        let err = conn
            .execute("INSERT INTO t VALUES (1, 1)", [])
            .with_statement("INSERT INTO t VALUES (1, 1)")
            .unwrap_err();

        assert!(err.is_duplicate_key());
    }
}
