//! Imaging exam models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{new_id, now_iso, JsonMap};

/// Lifecycle status shared by exam-like records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    #[default]
    Draft,
    Finalized,
}

/// An imaging exam (ultrasound, radiology, CT, echo).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exam {
    pub id: String,
    pub patient_id: String,
    pub exam_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Weight at exam time, kept separate from the patient record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referring_vet: Option<String>,
    #[serde(default)]
    pub organs_data: Vec<OrganData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    #[serde(default)]
    pub status: ExamStatus,
}

/// Findings for one organ inside an exam.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OrganData {
    pub organ_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_text: Option<String>,
    /// Open map: measurement keys vary by organ and exam type.
    #[serde(default)]
    pub measurements: JsonMap,
    /// Drawing payload; string, object or array depending on the editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_data: Option<Value>,
}

/// An image attached to an exam. Payloads are opaque base64 blobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub id: String,
    pub filename: String,
    pub data: String,
    /// Pre-annotation copy of the payload.
    #[serde(rename = "originalData")]
    pub original_data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Caller-supplied fields for a new exam.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamInput {
    pub patient_id: String,
    pub exam_type: Option<String>,
    pub date: Option<String>,
    pub exam_weight: Option<f64>,
    pub referring_vet: Option<String>,
    pub organs_data: Option<Vec<OrganData>>,
    pub report_content: Option<String>,
    pub conclusion: Option<String>,
}

/// Caller-supplied fields for a new image.
#[derive(Debug, Clone, Default)]
pub struct ImageInput {
    pub filename: String,
    pub data: String,
    pub mime_type: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Exam {
    /// Build a draft exam from caller input.
    pub fn from_input(input: ExamInput) -> Self {
        Self {
            id: new_id(),
            patient_id: input.patient_id,
            exam_type: input
                .exam_type
                .unwrap_or_else(|| "ultrasound_abd".to_string()),
            date: Some(input.date.unwrap_or_else(now_iso)),
            exam_weight: input.exam_weight,
            referring_vet: input.referring_vet,
            organs_data: input.organs_data.unwrap_or_default(),
            report_content: input.report_content,
            conclusion: input.conclusion,
            images: Vec::new(),
            status: ExamStatus::Draft,
        }
    }
}

impl ImageRecord {
    /// Build an image record; the original payload mirrors `data` until an
    /// annotation overwrites it.
    pub fn from_input(input: ImageInput) -> Self {
        Self {
            id: new_id(),
            filename: input.filename,
            original_data: input.data.clone(),
            data: input.data,
            mime_type: input.mime_type.unwrap_or_else(|| "image/png".to_string()),
            tags: input.tags.unwrap_or_default(),
        }
    }
}
