//! Reference data models: drugs, report templates, measurement references.

use serde::{Deserialize, Serialize};

use super::{new_id, PracticeKind};

/// A drug in the bundled formulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PracticeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dosage: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrugInput {
    pub name: String,
    pub kind: Option<PracticeKind>,
    pub category: Option<String>,
    pub default_dosage: Option<String>,
}

impl Drug {
    pub fn from_input(input: DrugInput) -> Self {
        Self {
            id: new_id(),
            name: input.name,
            kind: input.kind,
            category: Some(input.category.unwrap_or_else(|| "Geral".to_string())),
            default_dosage: input.default_dosage,
        }
    }
}

/// A report text template, optionally tied to an organ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organ: Option<String>,
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    "pt".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateInput {
    pub title: String,
    pub text: String,
    pub organ: Option<String>,
    pub lang: Option<String>,
}

impl Template {
    pub fn from_input(input: TemplateInput) -> Self {
        Self {
            id: new_id(),
            title: input.title,
            text: input.text,
            organ: input.organ,
            lang: input.lang.unwrap_or_else(default_lang),
        }
    }
}

/// A measurement reference range, keyed by organ (and optionally species
/// and animal size).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceValue {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    pub organ: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceValueInput {
    pub species: Option<String>,
    pub organ: String,
    pub parameter: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: Option<String>,
    pub size: Option<String>,
}

impl ReferenceValue {
    pub fn from_input(input: ReferenceValueInput) -> Self {
        Self {
            id: new_id(),
            species: input.species,
            organ: input.organ,
            parameter: input.parameter,
            min_value: input.min_value,
            max_value: input.max_value,
            unit: input.unit,
            size: input.size,
        }
    }
}

/// Filters for reference value listings.
#[derive(Debug, Clone, Default)]
pub struct ReferenceValueFilter {
    pub organ: Option<String>,
    pub species: Option<String>,
}
