//! Generic document operations: the sole persistence gateway.
//!
//! Documents are JSON objects keyed by id inside a named collection. Reads
//! return them in insertion order unless a sort is requested; writes validate
//! against the schema registry before touching the table.

use std::cmp::Ordering;

use rusqlite::{params, OptionalExtension};
use serde_json::{Map, Value};

use super::{Database, StoreError, StoreResult};
use crate::schema;

/// One predicate inside a selector conjunction.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Exact match on the field's JSON value. A missing field matches only
    /// an explicit null constraint.
    Eq(Value),
    /// Case-insensitive substring match on a text field.
    Contains(String),
}

/// Conjunction of field constraints.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    clauses: Vec<(String, Constraint)>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value` exactly.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), Constraint::Eq(value.into())));
        self
    }

    /// Require `field` to contain `needle`, ignoring case.
    pub fn contains(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.clauses
            .push((field.into(), Constraint::Contains(needle.into())));
        self
    }

    /// True when every clause holds for `doc`.
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|(field, constraint)| {
            let actual = doc.get(field).unwrap_or(&Value::Null);
            match constraint {
                Constraint::Eq(expected) => actual == expected,
                Constraint::Contains(needle) => actual
                    .as_str()
                    .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort and limit for a find.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn sorted(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            sort: Some((field.into(), order)),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Total order over JSON values: by type rank, then by value. Keeps sort
/// results deterministic across mixed-type fields.
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn doc_id(doc: &Value) -> &str {
    doc.get("id").and_then(Value::as_str).unwrap_or_default()
}

impl Database {
    /// Insert a document. The id must already be set by the typed facade;
    /// a colliding id is a caller bug and is not retried.
    pub fn insert_doc(&self, collection: &'static str, doc: Value) -> StoreResult<Value> {
        let schema = schema::describe(collection).ok_or_else(|| {
            StoreError::SchemaConflict(format!("unknown collection '{collection}'"))
        })?;
        schema::validate(schema, &doc)?;

        let id = doc_id(&doc).to_string();
        let body = serde_json::to_string(&doc)?;

        let result = self.conn().execute(
            "INSERT INTO documents (collection, id, schema_version, body) VALUES (?1, ?2, ?3, ?4)",
            params![collection, id, schema.version, body],
        );

        match result {
            Ok(_) => Ok(doc),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    id,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a document by id.
    pub fn find_doc(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let body: Option<String> = self
            .conn()
            .query_row(
                "SELECT body FROM documents WHERE collection = ? AND id = ?",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|b| serde_json::from_str(&b).map_err(Into::into))
            .transpose()
    }

    /// Find documents matching a selector.
    ///
    /// Results come back in insertion order unless a sort is given; equal
    /// sort keys break ties by id for determinism.
    pub fn find_docs(
        &self,
        collection: &str,
        selector: &Selector,
        options: &FindOptions,
    ) -> StoreResult<Vec<Value>> {
        let mut stmt = self.conn().prepare(
            "SELECT body FROM documents WHERE collection = ? ORDER BY rowid",
        )?;
        let rows = stmt.query_map([collection], |row| row.get::<_, String>(0))?;

        let mut docs = Vec::new();
        for body in rows {
            let doc: Value = serde_json::from_str(&body?)?;
            if selector.matches(&doc) {
                docs.push(doc);
            }
        }

        if let Some((field, order)) = &options.sort {
            docs.sort_by(|a, b| {
                let key_a = a.get(field).unwrap_or(&Value::Null);
                let key_b = b.get(field).unwrap_or(&Value::Null);
                let ordering = match order {
                    SortOrder::Asc => cmp_values(key_a, key_b),
                    SortOrder::Desc => cmp_values(key_b, key_a),
                };
                ordering.then_with(|| doc_id(a).cmp(doc_id(b)))
            });
        }

        if let Some(limit) = options.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    /// Shallow-merge `patch` into an existing document.
    ///
    /// Only the given top-level fields are replaced; nested objects are
    /// replaced wholesale, never deep-merged. Collaborators rely on that for
    /// open maps like `measurements`. The merged document is re-validated.
    pub fn patch_doc(&self, collection: &'static str, id: &str, patch: Value) -> StoreResult<Value> {
        let schema = schema::describe(collection).ok_or_else(|| {
            StoreError::SchemaConflict(format!("unknown collection '{collection}'"))
        })?;

        let patch = match patch {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::Validation {
                    collection: collection.to_string(),
                    field: "<patch>".to_string(),
                    message: "patch must be a JSON object".to_string(),
                })
            }
        };

        let mut doc = self
            .find_doc(collection, id)?
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        let obj = doc.as_object_mut().ok_or_else(|| StoreError::SchemaConflict(format!(
            "stored document '{id}' in '{collection}' is not a JSON object"
        )))?;
        for (key, value) in patch {
            obj.insert(key, value);
        }
        if schema.fields.iter().any(|f| f.name == "updated_at") {
            obj.insert(
                "updated_at".into(),
                Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }

        schema::validate(schema, &doc)?;

        self.conn().execute(
            "UPDATE documents SET body = ?, updated_at = datetime('now')
             WHERE collection = ? AND id = ?",
            params![serde_json::to_string(&doc)?, collection, id],
        )?;
        Ok(doc)
    }

    /// Remove a document. Removing a missing id is a no-op, not an error.
    pub fn remove_doc(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let rows_affected = self.conn().execute(
            "DELETE FROM documents WHERE collection = ? AND id = ?",
            params![collection, id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Count documents in a collection.
    pub fn count_docs(&self, collection: &str) -> StoreResult<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?",
            [collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Check for the presence of an id without deserializing the body.
    pub fn exists_doc(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row(
                "SELECT 1 FROM documents WHERE collection = ? AND id = ?",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

/// Shallow patch helper for building `Value` patches in facades.
pub(crate) fn patch_object(entries: Vec<(&str, Value)>) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    // reference_values is not touched by seeding, so counts stay exact.
    fn reference(id: &str, organ: &str, parameter: &str) -> Value {
        json!({ "id": id, "organ": organ, "parameter": parameter, "species": "canine" })
    }

    fn drug(id: &str, name: &str) -> Value {
        json!({ "id": id, "name": name })
    }

    #[test]
    fn test_insert_and_find() {
        let db = setup_db();
        db.insert_doc(
            schema::REFERENCE_VALUES,
            reference("rv_1", "Rim", "comprimento"),
        )
        .unwrap();

        let found = db
            .find_doc(schema::REFERENCE_VALUES, "rv_1")
            .unwrap()
            .unwrap();
        assert_eq!(found["organ"], "Rim");
        assert!(db.find_doc(schema::REFERENCE_VALUES, "nope").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let db = setup_db();
        db.insert_doc(schema::REFERENCE_VALUES, reference("rv_1", "Rim", "a"))
            .unwrap();
        let err = db
            .insert_doc(schema::REFERENCE_VALUES, reference("rv_1", "Baço", "b"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[test]
    fn test_same_id_allowed_across_collections() {
        let db = setup_db();
        db.insert_doc(schema::REFERENCE_VALUES, reference("shared", "Rim", "a"))
            .unwrap();
        let prescription = json!({ "id": "shared", "patient_id": "p1" });
        assert!(db.insert_doc(schema::PRESCRIPTIONS, prescription).is_ok());
    }

    #[test]
    fn test_find_docs_insertion_order() {
        let db = setup_db();
        for (id, organ) in [("rv_b", "Baço"), ("rv_a", "Rim"), ("rv_c", "Fígado")] {
            db.insert_doc(schema::REFERENCE_VALUES, reference(id, organ, "x"))
                .unwrap();
        }

        let all = db
            .find_docs(
                schema::REFERENCE_VALUES,
                &Selector::new(),
                &FindOptions::default(),
            )
            .unwrap();
        let organs: Vec<_> = all.iter().map(|d| d["organ"].as_str().unwrap()).collect();
        assert_eq!(organs, vec!["Baço", "Rim", "Fígado"]);
    }

    #[test]
    fn test_find_docs_sorted_with_id_tiebreak() {
        let db = setup_db();
        for (id, organ) in [("rv_2", "Rim"), ("rv_1", "Rim"), ("rv_3", "Baço")] {
            db.insert_doc(schema::REFERENCE_VALUES, reference(id, organ, "x"))
                .unwrap();
        }

        let sorted = db
            .find_docs(
                schema::REFERENCE_VALUES,
                &Selector::new(),
                &FindOptions::sorted("organ", SortOrder::Asc),
            )
            .unwrap();
        let ids: Vec<_> = sorted.iter().map(|d| d["id"].as_str().unwrap()).collect();
        // "Baço" < "Rim"; equal keys fall back to id order.
        assert_eq!(ids, vec!["rv_3", "rv_1", "rv_2"]);
    }

    #[test]
    fn test_selector_eq_and_contains() {
        let db = setup_db();
        db.insert_doc(
            schema::REFERENCE_VALUES,
            json!({ "id": "rv_1", "organ": "Rim", "parameter": "Comprimento renal", "species": "canine" }),
        )
        .unwrap();
        db.insert_doc(
            schema::REFERENCE_VALUES,
            json!({ "id": "rv_2", "organ": "Baço", "parameter": "Espessura", "species": "feline" }),
        )
        .unwrap();

        let canines = db
            .find_docs(
                schema::REFERENCE_VALUES,
                &Selector::new().eq("species", "canine"),
                &FindOptions::default(),
            )
            .unwrap();
        assert_eq!(canines.len(), 1);
        assert_eq!(canines[0]["id"], "rv_1");

        let hits = db
            .find_docs(
                schema::REFERENCE_VALUES,
                &Selector::new().contains("parameter", "RENAL"),
                &FindOptions::default(),
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["id"], "rv_1");
    }

    #[test]
    fn test_limit() {
        let db = setup_db();
        for i in 0..5 {
            db.insert_doc(
                schema::REFERENCE_VALUES,
                reference(&format!("rv_{i}"), "Rim", "x"),
            )
            .unwrap();
        }
        let limited = db
            .find_docs(
                schema::REFERENCE_VALUES,
                &Selector::new(),
                &FindOptions::default().with_limit(2),
            )
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_patch_is_shallow() {
        let db = setup_db();
        let exam = json!({
            "id": "e_1",
            "patient_id": "p_1",
            "organs_data": [{ "organ_name": "Fígado", "measurements": { "comprimento": 9.2 } }],
            "status": "draft"
        });
        db.insert_doc(schema::EXAMS, exam).unwrap();

        // Replacing organs_data swaps the whole array, losing the old
        // measurements map: nested values are never deep-merged.
        let patched = db
            .patch_doc(
                schema::EXAMS,
                "e_1",
                json!({ "organs_data": [{ "organ_name": "Baço" }] }),
            )
            .unwrap();
        assert_eq!(patched["organs_data"][0]["organ_name"], "Baço");
        assert!(patched["organs_data"][0].get("measurements").is_none());
        // Sibling fields are untouched.
        assert_eq!(patched["status"], "draft");
        assert_eq!(patched["patient_id"], "p_1");
    }

    #[test]
    fn test_patch_missing_id_is_not_found() {
        let db = setup_db();
        let err = db
            .patch_doc(schema::EXAMS, "ghost", json!({ "status": "finalized" }))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_patch_validates_merged_doc() {
        let db = setup_db();
        db.insert_doc(
            schema::EXAMS,
            json!({ "id": "e_1", "patient_id": "p_1", "status": "draft" }),
        )
        .unwrap();

        let err = db
            .patch_doc(schema::EXAMS, "e_1", json!({ "status": "archived" }))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let db = setup_db();
        db.insert_doc(schema::DRUGS, drug("d_1", "A")).unwrap();

        assert!(db.remove_doc(schema::DRUGS, "d_1").unwrap());
        assert!(!db.remove_doc(schema::DRUGS, "d_1").unwrap());
        assert!(!db.remove_doc(schema::DRUGS, "never_existed").unwrap());
    }

    #[test]
    fn test_patch_bumps_updated_at_when_declared() {
        let db = setup_db();
        db.insert_doc(
            schema::PATIENTS,
            json!({ "id": "p_1", "name": "Max", "scope": "VET" }),
        )
        .unwrap();

        let patched = db
            .patch_doc(schema::PATIENTS, "p_1", json!({ "weight": 30.5 }))
            .unwrap();
        assert!(patched["updated_at"].is_string());
    }
}
