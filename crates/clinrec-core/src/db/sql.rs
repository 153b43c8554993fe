//! SQLite schema definition.

/// Complete database schema for clinrec.
///
/// All record types share one keyed document table; `rowid` preserves
/// insertion order for unsorted queries.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Documents
-- ============================================================================

CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    schema_version INTEGER NOT NULL DEFAULT 0,
    body TEXT NOT NULL,                           -- JSON object
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);

-- ============================================================================
-- Store metadata (name tag, bookkeeping)
-- ============================================================================

CREATE TABLE IF NOT EXISTS store_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
