//! Imaging exam operations, including attached images.

use serde_json::Value;

use super::{patch_object, Database, FindOptions, Selector, SortOrder, StoreError, StoreResult};
use crate::models::{Exam, ExamInput, ImageInput, ImageRecord};
use crate::schema;

impl Database {
    /// Create a draft exam.
    pub fn create_exam(&self, input: ExamInput) -> StoreResult<Exam> {
        let exam = Exam::from_input(input);
        self.insert_doc(schema::EXAMS, serde_json::to_value(&exam)?)?;
        Ok(exam)
    }

    /// List exams, optionally for one patient, newest first.
    pub fn exams(&self, patient_id: Option<&str>) -> StoreResult<Vec<Exam>> {
        let mut selector = Selector::new();
        if let Some(patient_id) = patient_id {
            selector = selector.eq("patient_id", patient_id);
        }
        let docs = self.find_docs(
            schema::EXAMS,
            &selector,
            &FindOptions::sorted("date", SortOrder::Desc),
        )?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    /// Get an exam by id.
    pub fn exam(&self, id: &str) -> StoreResult<Option<Exam>> {
        self.find_doc(schema::EXAMS, id)?
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .transpose()
    }

    /// Patch an exam's fields.
    pub fn update_exam(&self, id: &str, patch: Value) -> StoreResult<Exam> {
        let doc = self.patch_doc(schema::EXAMS, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Delete an exam. Idempotent.
    pub fn delete_exam(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::EXAMS, id)?;
        Ok(())
    }

    /// Append an image to an exam's image list.
    pub fn save_image(&self, exam_id: &str, input: ImageInput) -> StoreResult<ImageRecord> {
        let doc = self
            .find_doc(schema::EXAMS, exam_id)?
            .ok_or_else(|| StoreError::NotFound {
                collection: schema::EXAMS.to_string(),
                id: exam_id.to_string(),
            })?;

        let image = ImageRecord::from_input(input);
        let mut images = match doc.get("images").cloned() {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        images.push(serde_json::to_value(&image)?);

        self.patch_doc(
            schema::EXAMS,
            exam_id,
            patch_object(vec![("images", Value::Array(images))]),
        )?;
        Ok(image)
    }

    /// Remove an image from an exam. Unknown exam or image ids are a no-op.
    pub fn delete_image(&self, exam_id: &str, image_id: &str) -> StoreResult<()> {
        let Some(doc) = self.find_doc(schema::EXAMS, exam_id)? else {
            return Ok(());
        };

        let images: Vec<Value> = match doc.get("images") {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|img| img.get("id").and_then(Value::as_str) != Some(image_id))
                .cloned()
                .collect(),
            _ => return Ok(()),
        };

        self.patch_doc(
            schema::EXAMS,
            exam_id,
            patch_object(vec![("images", Value::Array(images))]),
        )?;
        Ok(())
    }
}
