//! Patient operations.

use serde_json::Value;

use super::{Database, FindOptions, Selector, SortOrder, StoreResult};
use crate::models::{Patient, PatientFilter, PatientInput};
use crate::schema;

impl Database {
    /// Create a patient. The store assigns the id and infers the
    /// segregation scope when the caller does not set one.
    pub fn create_patient(&self, input: PatientInput) -> StoreResult<Patient> {
        let patient = Patient::from_input(input);
        self.insert_doc(schema::PATIENTS, serde_json::to_value(&patient)?)?;
        Ok(patient)
    }

    /// List patients, optionally restricted to one scope, sorted by name.
    pub fn patients(&self, filter: &PatientFilter) -> StoreResult<Vec<Patient>> {
        let mut selector = Selector::new();
        if let Some(scope) = filter.scope {
            selector = selector.eq("scope", serde_json::to_value(scope)?);
        }
        let docs = self.find_docs(
            schema::PATIENTS,
            &selector,
            &FindOptions::sorted("name", SortOrder::Asc),
        )?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    /// Get a patient by id.
    pub fn patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        self.find_doc(schema::PATIENTS, id)?
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .transpose()
    }

    /// Patch a patient's fields.
    pub fn update_patient(&self, id: &str, patch: Value) -> StoreResult<Patient> {
        let doc = self.patch_doc(schema::PATIENTS, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Delete a patient and cascade-delete its imaging exams.
    ///
    /// Other patient-linked records (prescriptions, lab exams, anamnesis,
    /// ophthalmo) are kept as orphan history.
    pub fn delete_patient(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::PATIENTS, id)?;

        let exams = self.find_docs(
            schema::EXAMS,
            &Selector::new().eq("patient_id", id),
            &FindOptions::default(),
        )?;
        for exam in exams {
            if let Some(exam_id) = exam.get("id").and_then(Value::as_str) {
                self.remove_doc(schema::EXAMS, exam_id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExamInput, PracticeScope};
    use serde_json::json;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup_db();

        let created = db
            .create_patient(PatientInput {
                name: "Max".into(),
                species: Some("canine".into()),
                breed: Some("Golden Retriever".into()),
                weight: Some(30.0),
                ..Default::default()
            })
            .unwrap();

        let retrieved = db.patient(&created.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Max");
        assert_eq!(retrieved.scope, PracticeScope::Vet);
        assert_eq!(retrieved.weight, Some(30.0));
        assert!(retrieved.created_at.is_some());
    }

    #[test]
    fn test_list_filtered_by_scope_sorted_by_name() {
        let db = setup_db();
        for (name, practice) in [("Zeca", None), ("Ana", Some("human")), ("Luna", None)] {
            db.create_patient(PatientInput {
                name: name.into(),
                practice: practice.map(Into::into),
                ..Default::default()
            })
            .unwrap();
        }

        let vets = db
            .patients(&PatientFilter {
                scope: Some(PracticeScope::Vet),
            })
            .unwrap();
        let names: Vec<_> = vets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Luna", "Zeca"]);

        let all = db.patients(&PatientFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Ana");
    }

    #[test]
    fn test_update_patient() {
        let db = setup_db();
        let patient = db
            .create_patient(PatientInput {
                name: "Max".into(),
                ..Default::default()
            })
            .unwrap();

        let updated = db
            .update_patient(&patient.id, json!({ "weight": 32.0, "is_neutered": true }))
            .unwrap();
        assert_eq!(updated.weight, Some(32.0));
        assert_eq!(updated.is_neutered, Some(true));
        assert_eq!(updated.name, "Max");
    }

    #[test]
    fn test_delete_cascades_exams_only() {
        let db = setup_db();
        let patient = db
            .create_patient(PatientInput {
                name: "Max".into(),
                ..Default::default()
            })
            .unwrap();

        for _ in 0..2 {
            db.create_exam(ExamInput {
                patient_id: patient.id.clone(),
                ..Default::default()
            })
            .unwrap();
        }
        let prescription = db
            .create_prescription(crate::models::PrescriptionInput {
                patient_id: patient.id.clone(),
                ..Default::default()
            })
            .unwrap();

        db.delete_patient(&patient.id).unwrap();

        assert!(db.patient(&patient.id).unwrap().is_none());
        assert!(db.exams(Some(&patient.id)).unwrap().is_empty());
        // Prescriptions survive as orphan history.
        assert_eq!(db.prescriptions(Some(&patient.id)).unwrap().len(), 1);
        assert_eq!(
            db.prescriptions(Some(&patient.id)).unwrap()[0].id,
            prescription.id
        );
    }
}
