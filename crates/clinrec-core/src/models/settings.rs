//! Settings singleton and clinic identity profiles.

use serde::{Deserialize, Serialize};

use super::{new_id, PracticeKind};

/// Letterhead page margins in millimetres.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 30.0,
            left: 15.0,
            right: 15.0,
            bottom: 20.0,
        }
    }
}

/// The global settings singleton. Exactly one instance exists after store
/// initialization; the active profile's identity fields are mirrored here
/// flattened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub id: String,
    #[serde(default)]
    pub clinic_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veterinarian_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crmv: Option<String>,
    pub active_profile_id: Option<String>,
    pub active_profile_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_phone: Option<String>,
    pub letterhead_path: Option<String>,
    pub signature_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letterhead_margins_mm: Option<Margins>,
    #[serde(default)]
    pub practice_type: PracticeKind,
    #[serde(default)]
    pub active_modules: Vec<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "light".to_string()
}

impl Settings {
    /// Defaults written when the singleton is absent.
    pub fn defaults() -> Self {
        Self {
            id: crate::schema::GLOBAL_SETTINGS_ID.to_string(),
            clinic_name: String::new(),
            veterinarian_name: None,
            crmv: None,
            active_profile_id: None,
            active_profile_name: None,
            clinic_address: None,
            professional_email: None,
            professional_phone: None,
            letterhead_path: None,
            signature_path: None,
            letterhead_margins_mm: None,
            practice_type: PracticeKind::Vet,
            active_modules: vec![
                "core".to_string(),
                "ultrasound".to_string(),
                "financial".to_string(),
                "prescription".to_string(),
            ],
            theme: default_theme(),
        }
    }
}

/// A clinic identity profile. One profile may be active; activating it
/// flattens its fields into the settings singleton.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub clinic_name: String,
    #[serde(default)]
    pub clinic_address: String,
    #[serde(default)]
    pub veterinarian_name: String,
    #[serde(default)]
    pub crmv: String,
    #[serde(default)]
    pub professional_email: String,
    #[serde(default)]
    pub professional_phone: String,
    pub letterhead_path: Option<String>,
    pub signature_path: Option<String>,
    #[serde(default)]
    pub letterhead_margins_mm: Margins,
}

/// Caller-supplied identity fields for a new profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub clinic_name: Option<String>,
    pub clinic_address: Option<String>,
    pub veterinarian_name: Option<String>,
    pub crmv: Option<String>,
    pub professional_email: Option<String>,
    pub professional_phone: Option<String>,
    pub letterhead_path: Option<String>,
    pub signature_path: Option<String>,
    pub letterhead_margins_mm: Option<Margins>,
}

impl Profile {
    pub fn from_input(name: String, input: ProfileInput) -> Self {
        Self {
            id: new_id(),
            name,
            clinic_name: input.clinic_name.unwrap_or_default(),
            clinic_address: input.clinic_address.unwrap_or_default(),
            veterinarian_name: input.veterinarian_name.unwrap_or_default(),
            crmv: input.crmv.unwrap_or_default(),
            professional_email: input.professional_email.unwrap_or_default(),
            professional_phone: input.professional_phone.unwrap_or_default(),
            letterhead_path: input.letterhead_path,
            signature_path: input.signature_path,
            letterhead_margins_mm: input.letterhead_margins_mm.unwrap_or_default(),
        }
    }
}
