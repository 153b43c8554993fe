//! Ophthalmologic exam models (per-eye observation sets).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{new_id, now_iso, ExamStatus, JsonMap};

/// Observations for a single eye. Biomicroscopy and fundoscopy stay open
/// maps: the fields filled in vary with the device and the examiner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EyeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_acuity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_acuity_corrected: Option<String>,
    /// Intraocular pressure in mmHg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iop: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iop_method: Option<String>,
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub biomicroscopy: JsonMap,
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub fundoscopy: JsonMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_fundus_drawing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campimetry_grid: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conduct: Option<String>,
}

/// A full ophthalmologic exam.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OphthalmoExam {
    pub id: String,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requesting_doctor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_medications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default)]
    pub right_eye: EyeData,
    #[serde(default)]
    pub left_eye: EyeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ExamStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<String>,
}

/// Caller-supplied fields for a new ophthalmo exam.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OphthalmoInput {
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub date: Option<String>,
    pub doctor_name: Option<String>,
    pub requesting_doctor: Option<String>,
    pub chief_complaint: Option<String>,
    pub clinical_history: Option<String>,
    pub current_medications: Option<String>,
    pub allergies: Option<String>,
    pub right_eye: Option<EyeData>,
    pub left_eye: Option<EyeData>,
    pub general_diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub follow_up: Option<String>,
    pub notes: Option<String>,
}

impl OphthalmoExam {
    pub fn from_input(input: OphthalmoInput) -> Self {
        let now = now_iso();
        Self {
            id: new_id(),
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            date: Some(input.date.unwrap_or_else(|| now.clone())),
            doctor_name: input.doctor_name,
            requesting_doctor: input.requesting_doctor,
            chief_complaint: input.chief_complaint,
            clinical_history: input.clinical_history,
            current_medications: input.current_medications,
            allergies: input.allergies,
            right_eye: input.right_eye.unwrap_or_default(),
            left_eye: input.left_eye.unwrap_or_default(),
            general_diagnosis: input.general_diagnosis,
            treatment_plan: input.treatment_plan,
            follow_up: input.follow_up,
            notes: input.notes,
            status: ExamStatus::Draft,
            created_at: Some(now),
            updated_at: None,
            finalized_at: None,
        }
    }
}
