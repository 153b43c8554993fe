//! Database layer for clinrec.

mod sql;
mod documents;
mod patients;
mod exams;
mod clinical;
mod reference;
mod settings;
mod financial;
mod timeline;

pub use documents::*;
#[allow(unused_imports)]
pub use timeline::*;

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

use crate::migrate;
use crate::schema;
use crate::seed;

/// Embedded store tag. A database carrying a different tag was written by an
/// incompatible deployment and is refused rather than wiped.
pub const STORE_TAG: &str = "clinrec_v1";

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation failed on {collection}.{field}: {message}")]
    Validation {
        collection: String,
        field: String,
        message: String,
    },

    #[error("duplicate id '{id}' in collection '{collection}'")]
    DuplicateKey { collection: String, id: String },

    #[error("record '{id}' not found in collection '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("schema conflict: {0}")]
    SchemaConflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Database connection wrapper.
///
/// Opening a database runs the full initialization pipeline: table creation,
/// store tag check, per-collection migrations, and reference-data seeding.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema, migrate persisted documents, then seed.
    fn initialize(&mut self) -> StoreResult<()> {
        self.conn.execute_batch(sql::SCHEMA)?;
        self.check_store_tag()?;
        self.run_migrations()?;
        seed::seed_database(self)?;
        tracing::info!(tag = STORE_TAG, "clinical record store ready");
        Ok(())
    }

    /// Verify the embedded name tag, stamping a fresh database.
    fn check_store_tag(&self) -> StoreResult<()> {
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = 'store_tag'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match existing.as_deref() {
            None => {
                self.conn.execute(
                    "INSERT INTO store_meta (key, value) VALUES ('store_tag', ?)",
                    [STORE_TAG],
                )?;
                Ok(())
            }
            Some(tag) if tag == STORE_TAG => Ok(()),
            Some(other) => {
                tracing::error!(found = other, expected = STORE_TAG, "store tag mismatch");
                Err(StoreError::SchemaConflict(format!(
                    "database is tagged '{other}', expected '{STORE_TAG}'"
                )))
            }
        }
    }

    /// Upgrade every persisted document to its collection's current schema
    /// version. Each collection migrates inside its own transaction so a
    /// failing chain cannot corrupt the others.
    fn run_migrations(&mut self) -> StoreResult<()> {
        for schema in schema::REGISTRY {
            let tx = self.conn.transaction()?;
            let mut migrated = 0usize;

            {
                let mut stmt = tx.prepare(
                    "SELECT id, schema_version, body FROM documents
                     WHERE collection = ? AND schema_version != ?",
                )?;
                let rows = stmt.query_map(
                    rusqlite::params![schema.collection, schema.version],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, u32>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )?;

                let mut pending = Vec::new();
                for row in rows {
                    pending.push(row?);
                }

                for (id, stored_version, body) in pending {
                    let doc: serde_json::Value = serde_json::from_str(&body)?;
                    let upgraded =
                        migrate::upgrade(schema.collection, stored_version, schema.version, doc)?;
                    tx.execute(
                        "UPDATE documents
                         SET body = ?, schema_version = ?, updated_at = datetime('now')
                         WHERE collection = ? AND id = ?",
                        rusqlite::params![
                            serde_json::to_string(&upgraded)?,
                            schema.version,
                            schema.collection,
                            id
                        ],
                    )?;
                    migrated += 1;
                }
            }

            tx.commit()?;
            if migrated > 0 {
                tracing::info!(
                    collection = schema.collection,
                    count = migrated,
                    version = schema.version,
                    "migrated documents"
                );
            }
        }
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_tables_created() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"documents".to_string()));
        assert!(tables.contains(&"store_meta".to_string()));
    }

    #[test]
    fn test_store_tag_stamped() {
        let db = Database::open_in_memory().unwrap();
        let tag: String = db
            .conn()
            .query_row(
                "SELECT value FROM store_meta WHERE key = 'store_tag'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tag, STORE_TAG);
    }

    #[test]
    fn test_foreign_tag_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");

        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(sql::SCHEMA).unwrap();
            conn.execute(
                "INSERT INTO store_meta (key, value) VALUES ('store_tag', 'someone_else_v9')",
                [],
            )
            .unwrap();
        }

        let result = Database::open(&path);
        assert!(matches!(result, Err(StoreError::SchemaConflict(_))));
    }
}
