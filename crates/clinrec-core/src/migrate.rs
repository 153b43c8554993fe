//! Migration engine: ordered chains of pure document transforms.
//!
//! Each collection owns a list of steps indexed by source version; step `n`
//! produces a version `n + 1` document. Steps only add, rename or default
//! fields and never drop data they do not understand. They run once at store
//! initialization, before any document is returned to a caller.

use serde_json::{Map, Value};

use crate::db::{StoreError, StoreResult};
use crate::schema;

/// A pure, total transform from version `from` to `from + 1`.
#[derive(Clone, Copy)]
pub struct MigrationStep {
    pub from: u32,
    pub apply: fn(Value) -> Value,
}

const fn step(from: u32, apply: fn(Value) -> Value) -> MigrationStep {
    MigrationStep { from, apply }
}

fn pass_through(doc: Value) -> Value {
    doc
}

static PATIENT_CHAIN: [MigrationStep; 2] = [step(0, pass_through), step(1, patient_default_scope)];
static SETTINGS_CHAIN: [MigrationStep; 2] = [step(0, pass_through), step(1, pass_through)];
static EXAM_CHAIN: [MigrationStep; 3] = [
    step(0, pass_through),
    step(1, pass_through),
    step(2, pass_through),
];
static FINANCIAL_CHAIN: [MigrationStep; 1] = [step(0, financial_backfill_cashflow)];
static OPHTHALMO_CHAIN: [MigrationStep; 1] = [step(0, ophthalmo_lift_eyes)];
static DRUG_CHAIN: [MigrationStep; 1] = [step(0, drug_default_category)];

/// Ordered migration chain for a collection. Collections still at version 0
/// have no steps.
pub fn chain(collection: &str) -> &'static [MigrationStep] {
    match collection {
        schema::PATIENTS => &PATIENT_CHAIN,
        schema::SETTINGS => &SETTINGS_CHAIN,
        schema::EXAMS => &EXAM_CHAIN,
        schema::FINANCIAL => &FINANCIAL_CHAIN,
        schema::OPHTHALMO => &OPHTHALMO_CHAIN,
        schema::DRUGS => &DRUG_CHAIN,
        _ => &[],
    }
}

/// Bring a document from its stored version to the registry's current
/// version. A stored version above current, or a gap in the chain, is a
/// schema conflict and the caller aborts initialization.
pub fn upgrade(
    collection: &str,
    stored_version: u32,
    current_version: u32,
    mut doc: Value,
) -> StoreResult<Value> {
    if stored_version == current_version {
        return Ok(doc);
    }
    if stored_version > current_version {
        return Err(StoreError::SchemaConflict(format!(
            "collection '{collection}' holds a document at version {stored_version}, \
             newer than the registry's version {current_version}"
        )));
    }

    let steps = chain(collection);
    for version in stored_version..current_version {
        let step = steps.iter().find(|s| s.from == version).ok_or_else(|| {
            StoreError::SchemaConflict(format!(
                "collection '{collection}' has no migration from version {version}"
            ))
        })?;
        doc = (step.apply)(doc);
    }
    Ok(doc)
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

fn is_set(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(|v| !v.is_null())
}

/// patients v1 -> v2: fill `scope`, inferring HUMAN from the legacy
/// free-text `practice` field and defaulting everything else to VET.
fn patient_default_scope(mut doc: Value) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        if !is_set(obj, "scope") {
            let scope = match obj.get("practice").and_then(Value::as_str) {
                Some("human") => "HUMAN",
                _ => "VET",
            };
            obj.insert("scope".into(), Value::String(scope.into()));
        }
    }
    doc
}

/// financial v0 -> v1: backfill professional cashflow fields from the legacy
/// single `date`. A record without a status was recorded as settled, so it
/// becomes `paid` with `paid_at` taken from the legacy date.
fn financial_backfill_cashflow(mut doc: Value) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        let legacy_date = obj.get("date").cloned().unwrap_or(Value::Null);
        let was_pending = obj.get("status").and_then(Value::as_str) == Some("pending");

        if !is_set(obj, "status") {
            obj.insert("status".into(), Value::String("paid".into()));
        }
        if !is_set(obj, "payment_method") {
            obj.insert("payment_method".into(), Value::String("cash".into()));
        }
        if !is_set(obj, "due_date") {
            obj.insert("due_date".into(), legacy_date.clone());
        }
        if !is_set(obj, "paid_at") {
            let paid_at = if was_pending { Value::Null } else { legacy_date };
            obj.insert("paid_at".into(), paid_at);
        }
    }
    doc
}

/// Flat observation fields written by the legacy single-eye ophthalmo shape.
const LEGACY_EYE_FIELDS: &[&str] = &[
    "visual_acuity",
    "visual_acuity_corrected",
    "iop",
    "iop_method",
    "biomicroscopy",
    "fundoscopy",
    "eye_fundus_drawing",
    "campimetry_grid",
];

/// ophthalmo v0 -> v1: lift the legacy flat observation set into per-eye
/// maps. Legacy records carried a single set with no laterality; it maps to
/// the right eye. `general_diagnosis` inherits the legacy `diagnosis`.
fn ophthalmo_lift_eyes(mut doc: Value) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        let mut lifted = Map::new();
        for key in LEGACY_EYE_FIELDS {
            if let Some(value) = obj.remove(*key) {
                if !value.is_null() {
                    lifted.insert((*key).to_string(), value);
                }
            }
        }

        match obj.get_mut("right_eye").and_then(Value::as_object_mut) {
            Some(right) => {
                for (key, value) in lifted {
                    right.entry(key).or_insert(value);
                }
            }
            None => {
                obj.insert("right_eye".into(), Value::Object(lifted));
            }
        }
        if !is_set(obj, "left_eye") {
            obj.insert("left_eye".into(), Value::Object(Map::new()));
        }

        // The legacy top-level diagnosis renames to general_diagnosis; a
        // non-string value is data this step does not understand and stays.
        let legacy_diagnosis = matches!(obj.get("diagnosis"), Some(Value::String(_)));
        if !is_set(obj, "general_diagnosis") {
            let diagnosis = if legacy_diagnosis {
                obj.remove("diagnosis").unwrap_or_default()
            } else {
                Value::String(String::new())
            };
            obj.insert("general_diagnosis".into(), diagnosis);
        } else if legacy_diagnosis {
            obj.remove("diagnosis");
        }

        // A pure step has no clock; the exam date is the closest truth.
        if !is_set(obj, "created_at") {
            if let Some(date) = obj.get("date").cloned().filter(|v| v.is_string()) {
                obj.insert("created_at".into(), date);
            }
        }
    }
    doc
}

/// drugs v0 -> v1: default missing category (seed hygiene).
fn drug_default_category(mut doc: Value) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        if !is_set(obj, "category") {
            obj.insert("category".into(), Value::String("Geral".into()));
        }
    }
    doc
}
