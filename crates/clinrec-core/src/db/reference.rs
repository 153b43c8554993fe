//! Reference data operations: drugs, report templates, measurement
//! reference values.

use serde_json::Value;

use super::{Database, FindOptions, Selector, SortOrder, StoreResult};
use crate::models::{
    Drug, DrugInput, PracticeKind, ReferenceValue, ReferenceValueFilter, ReferenceValueInput,
    Template, TemplateInput,
};
use crate::schema;

impl Database {
    // =========================================================================
    // Drugs
    // =========================================================================

    pub fn create_drug(&self, input: DrugInput) -> StoreResult<Drug> {
        let drug = Drug::from_input(input);
        self.insert_doc(schema::DRUGS, serde_json::to_value(&drug)?)?;
        Ok(drug)
    }

    /// List drugs, optionally restricted to one practice.
    pub fn drugs(&self, kind: Option<PracticeKind>) -> StoreResult<Vec<Drug>> {
        let mut selector = Selector::new();
        if let Some(kind) = kind {
            selector = selector.eq("type", serde_json::to_value(kind)?);
        }
        let docs = self.find_docs(
            schema::DRUGS,
            &selector,
            &FindOptions::sorted("name", SortOrder::Asc),
        )?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    /// Search drugs by case-insensitive substring on the name.
    pub fn search_drugs(
        &self,
        query: &str,
        kind: Option<PracticeKind>,
        limit: usize,
    ) -> StoreResult<Vec<Drug>> {
        let mut selector = Selector::new().contains("name", query);
        if let Some(kind) = kind {
            selector = selector.eq("type", serde_json::to_value(kind)?);
        }
        let docs = self.find_docs(
            schema::DRUGS,
            &selector,
            &FindOptions::sorted("name", SortOrder::Asc).with_limit(limit),
        )?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub fn update_drug(&self, id: &str, patch: Value) -> StoreResult<Drug> {
        let doc = self.patch_doc(schema::DRUGS, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn delete_drug(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::DRUGS, id)?;
        Ok(())
    }

    // =========================================================================
    // Templates
    // =========================================================================

    pub fn create_template(&self, input: TemplateInput) -> StoreResult<Template> {
        let template = Template::from_input(input);
        self.insert_doc(schema::TEMPLATES, serde_json::to_value(&template)?)?;
        Ok(template)
    }

    /// List templates, optionally for one organ.
    pub fn templates(&self, organ: Option<&str>) -> StoreResult<Vec<Template>> {
        let mut selector = Selector::new();
        if let Some(organ) = organ {
            selector = selector.eq("organ", organ);
        }
        let docs = self.find_docs(schema::TEMPLATES, &selector, &FindOptions::default())?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub fn update_template(&self, id: &str, patch: Value) -> StoreResult<Template> {
        let doc = self.patch_doc(schema::TEMPLATES, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn delete_template(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::TEMPLATES, id)?;
        Ok(())
    }

    // =========================================================================
    // Reference values
    // =========================================================================

    pub fn create_reference_value(&self, input: ReferenceValueInput) -> StoreResult<ReferenceValue> {
        let reference = ReferenceValue::from_input(input);
        self.insert_doc(schema::REFERENCE_VALUES, serde_json::to_value(&reference)?)?;
        Ok(reference)
    }

    pub fn reference_values(&self, filter: &ReferenceValueFilter) -> StoreResult<Vec<ReferenceValue>> {
        let mut selector = Selector::new();
        if let Some(organ) = &filter.organ {
            selector = selector.eq("organ", organ.as_str());
        }
        if let Some(species) = &filter.species {
            selector = selector.eq("species", species.as_str());
        }
        let docs = self.find_docs(schema::REFERENCE_VALUES, &selector, &FindOptions::default())?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub fn update_reference_value(&self, id: &str, patch: Value) -> StoreResult<ReferenceValue> {
        let doc = self.patch_doc(schema::REFERENCE_VALUES, id, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn delete_reference_value(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::REFERENCE_VALUES, id)?;
        Ok(())
    }
}
