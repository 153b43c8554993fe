//! Patient models.

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso};

/// Segregation scope: veterinary and human patients never mix in listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PracticeScope {
    #[serde(rename = "VET")]
    Vet,
    #[serde(rename = "HUMAN")]
    Human,
}

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub scope: PracticeScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(rename = "ownerPhone", skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,
    /// National document number (CPF or similar), human practice only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<String>,
    /// Weight in kg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_neutered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Legacy free-text practice field, kept for scope inference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice: Option<String>,
}

/// Caller-supplied fields for a new patient. The store assigns the id and
/// timestamps and infers the scope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientInput {
    pub name: String,
    pub scope: Option<PracticeScope>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub size: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub document: Option<String>,
    pub birth_date: Option<String>,
    pub birth_year: Option<String>,
    pub weight: Option<f64>,
    pub sex: Option<String>,
    pub is_neutered: Option<bool>,
    pub practice: Option<String>,
}

/// Filters for patient listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatientFilter {
    pub scope: Option<PracticeScope>,
}

impl Patient {
    /// Build a patient from caller input. Scope keeps an explicit value,
    /// else is inferred from the legacy practice field, else defaults VET.
    pub fn from_input(input: PatientInput) -> Self {
        let scope = input.scope.unwrap_or(match input.practice.as_deref() {
            Some("human") => PracticeScope::Human,
            _ => PracticeScope::Vet,
        });
        Self {
            id: new_id(),
            name: input.name,
            scope,
            species: input.species,
            breed: input.breed,
            size: input.size,
            owner_name: input.owner_name,
            owner_phone: input.owner_phone,
            document: input.document,
            birth_date: input.birth_date,
            birth_year: input.birth_year,
            weight: input.weight,
            sex: input.sex,
            is_neutered: input.is_neutered,
            created_at: Some(now_iso()),
            updated_at: None,
            practice: input.practice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_inferred_from_practice() {
        let patient = Patient::from_input(PatientInput {
            name: "Ana".into(),
            practice: Some("human".into()),
            ..Default::default()
        });
        assert_eq!(patient.scope, PracticeScope::Human);

        let patient = Patient::from_input(PatientInput {
            name: "Max".into(),
            ..Default::default()
        });
        assert_eq!(patient.scope, PracticeScope::Vet);
        assert_eq!(patient.id.len(), 36); // UUID format
    }

    #[test]
    fn test_explicit_scope_wins() {
        let patient = Patient::from_input(PatientInput {
            name: "Ana".into(),
            scope: Some(PracticeScope::Human),
            practice: Some("vet".into()),
            ..Default::default()
        });
        assert_eq!(patient.scope, PracticeScope::Human);
    }
}
