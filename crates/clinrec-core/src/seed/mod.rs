//! Reference-data seeding.
//!
//! Runs at the end of store initialization. Reference collections are topped
//! up when they fall below a minimum population, so an updated bundled seed
//! set can land on upgraded deployments without wiping rows the user added.

pub mod data;

use serde_json::Value;

use crate::db::{Database, StoreError, StoreResult};
use crate::models::Settings;
use crate::schema;

/// Below these counts the bundled rows are (re-)inserted.
const MIN_DRUG_ROWS: usize = 10;
const MIN_TEMPLATE_ROWS: usize = 3;

pub(crate) fn seed_database(db: &Database) -> StoreResult<()> {
    // The settings singleton uses a presence check, not a count.
    if !db.exists_doc(schema::SETTINGS, schema::GLOBAL_SETTINGS_ID)? {
        tracing::info!("seeding default settings");
        db.insert_doc(schema::SETTINGS, serde_json::to_value(Settings::defaults())?)?;
    }

    ensure_seeded(db, schema::DRUGS, data::initial_drugs(), MIN_DRUG_ROWS)?;
    ensure_seeded(db, schema::TEMPLATES, data::initial_templates(), MIN_TEMPLATE_ROWS)?;
    Ok(())
}

/// Top up a reference collection when its population is below `min_count`.
///
/// Individual duplicate ids are skipped rather than aborting the batch:
/// a partially seeded database finishes seeding on the next startup.
pub fn ensure_seeded(
    db: &Database,
    collection: &'static str,
    rows: Vec<Value>,
    min_count: usize,
) -> StoreResult<usize> {
    if db.count_docs(collection)? >= min_count {
        return Ok(0);
    }

    let mut inserted = 0;
    for row in rows {
        match db.insert_doc(collection, row) {
            Ok(_) => inserted += 1,
            Err(StoreError::DuplicateKey { id, .. }) => {
                tracing::warn!(collection, id = %id, "seed row already present, skipping");
            }
            Err(e) => return Err(e),
        }
    }
    if inserted > 0 {
        tracing::info!(collection, inserted, "seeded reference rows");
    }
    Ok(inserted)
}
