//! Domain models for the clinrec store.

mod anamnesis;
mod exam;
mod financial;
mod lab;
mod ophthalmo;
mod patient;
mod prescription;
mod reference;
mod settings;

pub use anamnesis::*;
pub use exam::*;
pub use financial::*;
pub use lab::*;
pub use ophthalmo::*;
pub use patient::*;
pub use prescription::*;
pub use reference::*;
pub use settings::*;

use serde::{Deserialize, Serialize};

/// Open key→value map used for clinical payloads that vary by exam type.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Practice a record belongs to (lowercase; distinct from the uppercase
/// patient segregation scope).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    #[default]
    Vet,
    Human,
}

/// Store-assigned document id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current instant as the RFC 3339 string persisted everywhere.
pub(crate) fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
