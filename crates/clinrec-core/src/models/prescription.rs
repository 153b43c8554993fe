//! Prescription models.

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso};

/// A prescription issued for a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    pub id: String,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub items: Vec<PrescriptionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One prescribed drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PrescriptionItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_id: Option<String>,
    #[serde(default)]
    pub drug_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// Caller-supplied fields for a new prescription.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrescriptionInput {
    pub patient_id: String,
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub items: Option<Vec<PrescriptionItem>>,
    pub notes: Option<String>,
}

impl Prescription {
    pub fn from_input(input: PrescriptionInput) -> Self {
        Self {
            id: new_id(),
            patient_id: input.patient_id,
            doctor_name: input.doctor_name,
            date: Some(input.date.unwrap_or_else(now_iso)),
            items: input.items.unwrap_or_default(),
            notes: input.notes,
        }
    }
}
