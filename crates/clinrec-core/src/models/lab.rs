//! Laboratory exam models.

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso};

/// Flag on a single lab result relative to its reference range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResultFlag {
    Low,
    Normal,
    High,
    CriticalLow,
    CriticalHigh,
    /// No flag computed yet (serialized as the empty string).
    #[default]
    #[serde(rename = "")]
    Unflagged,
}

/// Lab exam lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabStatus {
    #[default]
    Draft,
    PendingReview,
    Finalized,
}

/// One measured parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LabResult {
    #[serde(default)]
    pub parameter: String,
    #[serde(default)]
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_max: Option<f64>,
    #[serde(default)]
    pub flag: ResultFlag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A laboratory exam with its result rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabExam {
    pub id: String,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veterinarian_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requesting_vet: Option<String>,
    pub exam_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_type_label: Option<String>,
    #[serde(default)]
    pub results: Vec<LabResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_history: Option<String>,
    #[serde(default)]
    pub status: LabStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_by: Option<String>,
}

/// Caller-supplied fields for a new lab exam.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabExamInput {
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub patient_species: Option<String>,
    pub owner_name: Option<String>,
    pub date: Option<String>,
    pub veterinarian_name: Option<String>,
    pub requesting_vet: Option<String>,
    pub exam_type: String,
    pub exam_type_label: Option<String>,
    pub results: Option<Vec<LabResult>>,
    pub conclusion: Option<String>,
    pub notes: Option<String>,
    pub clinical_history: Option<String>,
}

impl LabExam {
    pub fn from_input(input: LabExamInput) -> Self {
        let now = now_iso();
        Self {
            id: new_id(),
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            patient_species: input.patient_species,
            owner_name: input.owner_name,
            date: input.date.unwrap_or_else(|| now.clone()),
            veterinarian_name: input.veterinarian_name,
            requesting_vet: input.requesting_vet,
            exam_type: input.exam_type,
            exam_type_label: input.exam_type_label,
            results: input.results.unwrap_or_default(),
            conclusion: input.conclusion,
            notes: input.notes,
            clinical_history: input.clinical_history,
            status: LabStatus::Draft,
            created_at: Some(now),
            updated_at: None,
            finalized_at: None,
            finalized_by: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_serializes_to_wire_strings() {
        assert_eq!(
            serde_json::to_string(&ResultFlag::CriticalLow).unwrap(),
            "\"critical_low\""
        );
        assert_eq!(serde_json::to_string(&ResultFlag::Unflagged).unwrap(), "\"\"");

        let parsed: ResultFlag = serde_json::from_str("\"\"").unwrap();
        assert_eq!(parsed, ResultFlag::Unflagged);
    }
}
