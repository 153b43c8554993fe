//! Schema registry: per-collection shape declarations and write-time
//! validation.
//!
//! Each collection declares its current version, its fields, and which of
//! them are required. Referential fields (ids, enums, dates) must stay
//! structurally sound; clinical payloads vary by exam type, so they live in
//! fields declared as open maps and are not inspected further.

use serde_json::Value;

use crate::db::StoreError;

// Collection names.
pub const PATIENTS: &str = "patients";
pub const EXAMS: &str = "exams";
pub const OPHTHALMO: &str = "ophthalmo";
pub const ANAMNESIS: &str = "anamnesis";
pub const PRESCRIPTIONS: &str = "prescriptions";
pub const LAB_EXAMS: &str = "lab_exams";
pub const FINANCIAL: &str = "financial";
pub const DRUGS: &str = "drugs";
pub const TEMPLATES: &str = "templates";
pub const REFERENCE_VALUES: &str = "reference_values";
pub const SETTINGS: &str = "settings";
pub const PROFILES: &str = "profiles";

/// Id of the singleton settings document.
pub const GLOBAL_SETTINGS_ID: &str = "global_settings";

/// Structural type of a declared field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    Number,
    /// Number that must be strictly greater than zero (monetary amounts).
    PositiveNumber,
    Bool,
    /// RFC 3339 string. Format is not parsed at write time, only the type.
    DateTime,
    Enum(&'static [&'static str]),
    Array,
    /// Object whose declared shape is opaque to the store.
    Object,
    /// Object with arbitrary keys (measurements, physical exam findings).
    OpenMap,
    /// Any JSON value, including null (visual drawing payloads).
    Any,
}

/// A single declared field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn req(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
    }
}

const fn opt(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
    }
}

/// Declared shape of one collection.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub collection: &'static str,
    pub version: u32,
    pub fields: &'static [FieldSpec],
}

use FieldKind::*;

/// All collections known to the store, with their current schema versions.
pub static REGISTRY: &[Schema] = &[
    Schema {
        collection: PATIENTS,
        // v2 added "scope" for strict VET/HUMAN segregation
        version: 2,
        fields: &[
            req("id", Text),
            req("name", Text),
            opt("scope", Enum(&["VET", "HUMAN"])),
            opt("species", Text),
            opt("breed", Text),
            opt("size", Text),
            opt("owner_name", Text),
            opt("ownerPhone", Text),
            opt("document", Text),
            opt("birth_date", Text),
            opt("birth_year", Text),
            opt("weight", Number),
            opt("sex", Enum(&["M", "F", "male", "female"])),
            opt("is_neutered", Bool),
            opt("created_at", DateTime),
            opt("updated_at", DateTime),
            // legacy free-text practice field, kept for scope inference
            opt("practice", Text),
        ],
    },
    Schema {
        collection: EXAMS,
        version: 3,
        fields: &[
            req("id", Text),
            req("patient_id", Text),
            opt("exam_type", Text),
            opt("date", DateTime),
            opt("exam_weight", Number),
            opt("referring_vet", Text),
            opt("organs_data", Array),
            opt("report_content", Text),
            opt("conclusion", Text),
            opt("images", Array),
            opt("status", Enum(&["draft", "finalized"])),
        ],
    },
    Schema {
        collection: OPHTHALMO,
        version: 1,
        fields: &[
            req("id", Text),
            req("patient_id", Text),
            opt("patient_name", Text),
            opt("date", DateTime),
            opt("doctor_name", Text),
            opt("requesting_doctor", Text),
            opt("chief_complaint", Text),
            opt("clinical_history", Text),
            opt("current_medications", Text),
            opt("allergies", Text),
            opt("right_eye", OpenMap),
            opt("left_eye", OpenMap),
            opt("general_diagnosis", Text),
            opt("treatment_plan", Text),
            opt("follow_up", Text),
            opt("notes", Text),
            opt("status", Enum(&["draft", "finalized"])),
            opt("created_at", DateTime),
            opt("updated_at", DateTime),
            opt("finalized_at", DateTime),
        ],
    },
    Schema {
        collection: ANAMNESIS,
        version: 0,
        fields: &[
            req("id", Text),
            req("patient_id", Text),
            req("date", DateTime),
            opt("doctor_name", Text),
            req("type", Enum(&["vet", "human"])),
            opt("main_complaint", Text),
            opt("history", Text),
            opt("general_data", OpenMap),
            opt("physical_exam", OpenMap),
            opt("diagnosis", Text),
            opt("conduct", Text),
        ],
    },
    Schema {
        collection: PRESCRIPTIONS,
        version: 0,
        fields: &[
            req("id", Text),
            req("patient_id", Text),
            opt("doctor_name", Text),
            opt("date", DateTime),
            opt("items", Array),
            opt("notes", Text),
        ],
    },
    Schema {
        collection: LAB_EXAMS,
        version: 0,
        fields: &[
            req("id", Text),
            req("patient_id", Text),
            opt("patient_name", Text),
            opt("patient_species", Text),
            opt("owner_name", Text),
            req("date", DateTime),
            opt("veterinarian_name", Text),
            opt("requesting_vet", Text),
            req("exam_type", Text),
            opt("exam_type_label", Text),
            opt("results", Array),
            opt("conclusion", Text),
            opt("notes", Text),
            opt("clinical_history", Text),
            opt("status", Enum(&["draft", "pending_review", "finalized"])),
            opt("created_at", DateTime),
            opt("updated_at", DateTime),
            opt("finalized_at", DateTime),
            opt("finalized_by", Text),
        ],
    },
    Schema {
        collection: FINANCIAL,
        // v1 added professional cashflow fields
        version: 1,
        fields: &[
            req("id", Text),
            req("type", Enum(&["income", "expense"])),
            opt("category", Text),
            req("amount", PositiveNumber),
            // legacy base date, kept for backward compatibility
            req("date", DateTime),
            opt("description", Text),
            opt("patient_id", Text),
            opt("status", Enum(&["pending", "paid", "cancelled"])),
            opt(
                "payment_method",
                Enum(&["pix", "credit_card", "debit_card", "cash", "transfer"]),
            ),
            opt("due_date", DateTime),
            opt("paid_at", DateTime),
        ],
    },
    Schema {
        collection: DRUGS,
        // v1 defaults missing category
        version: 1,
        fields: &[
            req("id", Text),
            req("name", Text),
            opt("type", Enum(&["vet", "human"])),
            opt("category", Text),
            opt("default_dosage", Text),
        ],
    },
    Schema {
        collection: TEMPLATES,
        version: 0,
        fields: &[
            req("id", Text),
            req("title", Text),
            req("text", Text),
            opt("organ", Text),
            opt("lang", Text),
        ],
    },
    Schema {
        collection: REFERENCE_VALUES,
        version: 0,
        fields: &[
            req("id", Text),
            opt("species", Text),
            req("organ", Text),
            opt("parameter", Text),
            opt("min_value", Number),
            opt("max_value", Number),
            opt("unit", Text),
            opt("size", Text),
        ],
    },
    Schema {
        collection: SETTINGS,
        version: 2,
        fields: &[
            req("id", Text),
            opt("clinic_name", Text),
            opt("veterinarian_name", Text),
            opt("crmv", Text),
            opt("active_profile_id", Text),
            opt("active_profile_name", Text),
            opt("clinic_address", Text),
            opt("professional_email", Text),
            opt("professional_phone", Text),
            opt("letterhead_path", Text),
            opt("signature_path", Text),
            opt("letterhead_margins_mm", OpenMap),
            opt("practice_type", Enum(&["vet", "human"])),
            opt("active_modules", Array),
            opt("theme", Text),
        ],
    },
    Schema {
        collection: PROFILES,
        version: 0,
        fields: &[
            req("id", Text),
            req("name", Text),
            opt("clinic_name", Text),
            opt("clinic_address", Text),
            opt("veterinarian_name", Text),
            opt("crmv", Text),
            opt("professional_email", Text),
            opt("professional_phone", Text),
            opt("letterhead_path", Text),
            opt("signature_path", Text),
            opt("letterhead_margins_mm", OpenMap),
        ],
    },
];

/// Look up a collection's schema.
pub fn describe(collection: &str) -> Option<&'static Schema> {
    REGISTRY.iter().find(|s| s.collection == collection)
}

fn violation(collection: &str, field: &str, message: impl Into<String>) -> StoreError {
    StoreError::Validation {
        collection: collection.to_string(),
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a full document against its collection schema.
///
/// Required fields must be present and non-null. Every other declared field
/// may be null or absent. Top-level keys the schema does not declare are
/// rejected; arbitrary keys are only allowed inside open-map fields.
pub fn validate(schema: &Schema, doc: &Value) -> Result<(), StoreError> {
    let obj = doc.as_object().ok_or_else(|| {
        violation(schema.collection, "<root>", "document must be a JSON object")
    })?;

    for key in obj.keys() {
        if !schema.fields.iter().any(|f| f.name == key) {
            return Err(violation(schema.collection, key, "unknown field"));
        }
    }

    for field in schema.fields {
        let value = obj.get(field.name);
        match value {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(violation(
                        schema.collection,
                        field.name,
                        "required field is missing",
                    ));
                }
            }
            Some(value) => check_kind(schema.collection, field, value)?,
        }
    }

    Ok(())
}

fn check_kind(collection: &str, field: &FieldSpec, value: &Value) -> Result<(), StoreError> {
    match field.kind {
        FieldKind::Text | FieldKind::DateTime => {
            if !value.is_string() {
                return Err(violation(collection, field.name, "expected a string"));
            }
        }
        FieldKind::Number => {
            if !value.is_number() {
                return Err(violation(collection, field.name, "expected a number"));
            }
        }
        FieldKind::PositiveNumber => {
            let amount = value
                .as_f64()
                .ok_or_else(|| violation(collection, field.name, "expected a number"))?;
            if amount <= 0.0 {
                return Err(violation(
                    collection,
                    field.name,
                    "expected a number greater than zero",
                ));
            }
        }
        FieldKind::Bool => {
            if !value.is_boolean() {
                return Err(violation(collection, field.name, "expected a boolean"));
            }
        }
        FieldKind::Enum(allowed) => {
            let s = value
                .as_str()
                .ok_or_else(|| violation(collection, field.name, "expected a string"))?;
            if !allowed.contains(&s) {
                return Err(violation(
                    collection,
                    field.name,
                    format!("'{s}' is not one of {allowed:?}"),
                ));
            }
        }
        FieldKind::Array => {
            if !value.is_array() {
                return Err(violation(collection, field.name, "expected an array"));
            }
        }
        FieldKind::Object | FieldKind::OpenMap => {
            if !value.is_object() {
                return Err(violation(collection, field.name, "expected an object"));
            }
        }
        FieldKind::Any => {}
    }
    Ok(())
}
