//! Clinical record operations: anamnesis, ophthalmo exams, prescriptions
//! and lab exams.

use serde_json::Value;

use super::{Database, FindOptions, Selector, SortOrder, StoreResult};
use crate::models::{
    Anamnesis, AnamnesisInput, LabExam, LabExamInput, OphthalmoExam, OphthalmoInput, Prescription,
    PrescriptionInput,
};
use crate::schema;

fn by_patient(patient_id: Option<&str>) -> Selector {
    match patient_id {
        Some(id) => Selector::new().eq("patient_id", id),
        None => Selector::new(),
    }
}

fn newest_first() -> FindOptions {
    FindOptions::sorted("date", SortOrder::Desc)
}

impl Database {
    // =========================================================================
    // Anamnesis
    // =========================================================================

    pub fn create_anamnesis(&self, input: AnamnesisInput) -> StoreResult<Anamnesis> {
        let record = Anamnesis::from_input(input);
        self.insert_doc(schema::ANAMNESIS, serde_json::to_value(&record)?)?;
        Ok(record)
    }

    pub fn anamnesis_for_patient(&self, patient_id: &str) -> StoreResult<Vec<Anamnesis>> {
        let docs = self.find_docs(schema::ANAMNESIS, &by_patient(Some(patient_id)), &newest_first())?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub fn update_anamnesis(&self, id: &str, patch: Value) -> StoreResult<Anamnesis> {
        let doc = self.patch_doc(schema::ANAMNESIS, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn delete_anamnesis(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::ANAMNESIS, id)?;
        Ok(())
    }

    // =========================================================================
    // Ophthalmo exams
    // =========================================================================

    pub fn create_ophthalmo_exam(&self, input: OphthalmoInput) -> StoreResult<OphthalmoExam> {
        let exam = OphthalmoExam::from_input(input);
        self.insert_doc(schema::OPHTHALMO, serde_json::to_value(&exam)?)?;
        Ok(exam)
    }

    pub fn ophthalmo_exams(&self, patient_id: Option<&str>) -> StoreResult<Vec<OphthalmoExam>> {
        let docs = self.find_docs(schema::OPHTHALMO, &by_patient(patient_id), &newest_first())?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub fn ophthalmo_exam(&self, id: &str) -> StoreResult<Option<OphthalmoExam>> {
        self.find_doc(schema::OPHTHALMO, id)?
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .transpose()
    }

    pub fn update_ophthalmo_exam(&self, id: &str, patch: Value) -> StoreResult<OphthalmoExam> {
        let doc = self.patch_doc(schema::OPHTHALMO, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn delete_ophthalmo_exam(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::OPHTHALMO, id)?;
        Ok(())
    }

    // =========================================================================
    // Prescriptions
    // =========================================================================

    pub fn create_prescription(&self, input: PrescriptionInput) -> StoreResult<Prescription> {
        let prescription = Prescription::from_input(input);
        self.insert_doc(schema::PRESCRIPTIONS, serde_json::to_value(&prescription)?)?;
        Ok(prescription)
    }

    pub fn prescriptions(&self, patient_id: Option<&str>) -> StoreResult<Vec<Prescription>> {
        let docs = self.find_docs(schema::PRESCRIPTIONS, &by_patient(patient_id), &newest_first())?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub fn update_prescription(&self, id: &str, patch: Value) -> StoreResult<Prescription> {
        let doc = self.patch_doc(schema::PRESCRIPTIONS, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn delete_prescription(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::PRESCRIPTIONS, id)?;
        Ok(())
    }

    // =========================================================================
    // Lab exams
    // =========================================================================

    pub fn create_lab_exam(&self, input: LabExamInput) -> StoreResult<LabExam> {
        let exam = LabExam::from_input(input);
        self.insert_doc(schema::LAB_EXAMS, serde_json::to_value(&exam)?)?;
        Ok(exam)
    }

    pub fn lab_exams(&self, patient_id: Option<&str>) -> StoreResult<Vec<LabExam>> {
        let docs = self.find_docs(schema::LAB_EXAMS, &by_patient(patient_id), &newest_first())?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub fn lab_exam(&self, id: &str) -> StoreResult<Option<LabExam>> {
        self.find_doc(schema::LAB_EXAMS, id)?
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .transpose()
    }

    pub fn update_lab_exam(&self, id: &str, patch: Value) -> StoreResult<LabExam> {
        let doc = self.patch_doc(schema::LAB_EXAMS, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn delete_lab_exam(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::LAB_EXAMS, id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EyeData, LabResult, PracticeKind, PrescriptionItem, ResultFlag};
    use serde_json::json;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_anamnesis_roundtrip_with_open_maps() {
        let db = setup_db();

        let mut physical_exam = crate::models::JsonMap::new();
        physical_exam.insert("tpc".into(), json!("<2s"));
        physical_exam.insert("fc".into(), json!(120));

        let record = db
            .create_anamnesis(AnamnesisInput {
                patient_id: "p_1".into(),
                kind: PracticeKind::Vet,
                main_complaint: Some("Apatia há 2 dias".into()),
                physical_exam: Some(physical_exam),
                ..Default::default()
            })
            .unwrap();

        let listed = db.anamnesis_for_patient("p_1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, record.id);
        assert_eq!(listed[0].physical_exam["fc"], json!(120));
    }

    #[test]
    fn test_ophthalmo_per_eye_data() {
        let db = setup_db();
        let exam = db
            .create_ophthalmo_exam(OphthalmoInput {
                patient_id: "p_1".into(),
                right_eye: Some(EyeData {
                    iop: Some(18.0),
                    visual_acuity: Some("20/40".into()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .unwrap();

        let stored = db.ophthalmo_exam(&exam.id).unwrap().unwrap();
        assert_eq!(stored.right_eye.iop, Some(18.0));
        assert_eq!(stored.left_eye, EyeData::default());

        // Patching one eye replaces the whole eye object.
        let patched = db
            .update_ophthalmo_exam(&exam.id, json!({ "right_eye": { "iop": 22.0 } }))
            .unwrap();
        assert_eq!(patched.right_eye.iop, Some(22.0));
        assert_eq!(patched.right_eye.visual_acuity, None);
    }

    #[test]
    fn test_prescription_items() {
        let db = setup_db();
        db.create_prescription(PrescriptionInput {
            patient_id: "p_1".into(),
            doctor_name: Some("Dr Teste".into()),
            items: Some(vec![PrescriptionItem {
                drug_name: "Dipirona".into(),
                dosage: Some("1 cp a cada 8h".into()),
                quantity: Some("1 cx".into()),
                ..Default::default()
            }]),
            ..Default::default()
        })
        .unwrap();

        let listed = db.prescriptions(Some("p_1")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].items[0].drug_name, "Dipirona");
    }

    #[test]
    fn test_lab_exam_results() {
        let db = setup_db();
        let exam = db
            .create_lab_exam(LabExamInput {
                patient_id: "p_1".into(),
                exam_type: "hemogram".into(),
                results: Some(vec![LabResult {
                    parameter: "Hematócrito".into(),
                    value: "40".into(),
                    unit: Some("%".into()),
                    ref_min: Some(37.0),
                    ref_max: Some(55.0),
                    flag: ResultFlag::Normal,
                    category: Some("eritrograma".into()),
                }]),
                ..Default::default()
            })
            .unwrap();

        let stored = db.lab_exam(&exam.id).unwrap().unwrap();
        assert_eq!(stored.results.len(), 1);
        assert_eq!(stored.results[0].flag, ResultFlag::Normal);
    }
}
