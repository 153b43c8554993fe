//! Anamnesis (clinical interview) models.

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso, JsonMap, PracticeKind};

/// A clinical interview record. The general-data and physical-exam maps are
/// open: their keys depend on the practice scope and the form in use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Anamnesis {
    pub id: String,
    pub patient_id: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: PracticeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_complaint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub general_data: JsonMap,
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub physical_exam: JsonMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conduct: Option<String>,
}

/// Caller-supplied fields for a new anamnesis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnamnesisInput {
    pub patient_id: String,
    pub date: Option<String>,
    pub doctor_name: Option<String>,
    pub kind: PracticeKind,
    pub main_complaint: Option<String>,
    pub history: Option<String>,
    pub general_data: Option<JsonMap>,
    pub physical_exam: Option<JsonMap>,
    pub diagnosis: Option<String>,
    pub conduct: Option<String>,
}

impl Anamnesis {
    pub fn from_input(input: AnamnesisInput) -> Self {
        Self {
            id: new_id(),
            patient_id: input.patient_id,
            date: input.date.unwrap_or_else(now_iso),
            doctor_name: input.doctor_name,
            kind: input.kind,
            main_complaint: input.main_complaint,
            history: input.history,
            general_data: input.general_data.unwrap_or_default(),
            physical_exam: input.physical_exam.unwrap_or_default(),
            diagnosis: input.diagnosis,
            conduct: input.conduct,
        }
    }
}
