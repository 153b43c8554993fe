//! Settings singleton and clinic profile operations.

use serde_json::{json, Value};

use super::{Database, FindOptions, Selector, StoreError, StoreResult};
use crate::models::{Profile, ProfileInput, Settings};
use crate::schema;

impl Database {
    /// Get the settings singleton, creating it with defaults when absent.
    pub fn settings(&self) -> StoreResult<Settings> {
        match self.find_doc(schema::SETTINGS, schema::GLOBAL_SETTINGS_ID)? {
            Some(doc) => Ok(serde_json::from_value(doc)?),
            None => {
                tracing::warn!("settings singleton missing, recreating defaults");
                let defaults = Settings::defaults();
                self.insert_doc(schema::SETTINGS, serde_json::to_value(&defaults)?)?;
                Ok(defaults)
            }
        }
    }

    /// Patch the settings singleton.
    pub fn update_settings(&self, patch: Value) -> StoreResult<Settings> {
        self.settings()?;
        let doc = self.patch_doc(schema::SETTINGS, schema::GLOBAL_SETTINGS_ID, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    /// List all clinic profiles.
    pub fn profiles(&self) -> StoreResult<Vec<Profile>> {
        let docs = self.find_docs(schema::PROFILES, &Selector::new(), &FindOptions::default())?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    /// Create a profile and make it the active one.
    pub fn create_profile(&self, name: &str, input: ProfileInput) -> StoreResult<Profile> {
        let profile = Profile::from_input(name.to_string(), input);
        self.insert_doc(schema::PROFILES, serde_json::to_value(&profile)?)?;
        self.activate_profile(&profile.id)?;
        Ok(profile)
    }

    /// Patch a profile; when it is the active one, re-flatten it into the
    /// settings singleton so both stay in sync.
    pub fn update_profile(&self, id: &str, patch: Value) -> StoreResult<Profile> {
        let doc = self.patch_doc(schema::PROFILES, id, patch)?;
        let profile: Profile = serde_json::from_value(doc)?;

        if self.settings()?.active_profile_id.as_deref() == Some(id) {
            self.activate_profile(id)?;
        }
        Ok(profile)
    }

    /// Flatten a profile's identity fields into the settings singleton.
    pub fn activate_profile(&self, id: &str) -> StoreResult<Settings> {
        let doc = self
            .find_doc(schema::PROFILES, id)?
            .ok_or_else(|| StoreError::NotFound {
                collection: schema::PROFILES.to_string(),
                id: id.to_string(),
            })?;
        let profile: Profile = serde_json::from_value(doc)?;

        self.settings()?;
        // Absent identity fields flatten as nulls so stale values from a
        // previously active profile never linger.
        let patch = json!({
            "active_profile_id": profile.id,
            "active_profile_name": profile.name,
            "clinic_name": profile.clinic_name,
            "clinic_address": profile.clinic_address,
            "veterinarian_name": profile.veterinarian_name,
            "crmv": profile.crmv,
            "professional_email": profile.professional_email,
            "professional_phone": profile.professional_phone,
            "letterhead_path": profile.letterhead_path,
            "signature_path": profile.signature_path,
            "letterhead_margins_mm": profile.letterhead_margins_mm,
        });
        let doc = self.patch_doc(schema::SETTINGS, schema::GLOBAL_SETTINGS_ID, patch)?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Delete a profile, clearing the active reference when it pointed at
    /// the deleted one.
    pub fn delete_profile(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::PROFILES, id)?;

        let settings = self.settings()?;
        if settings.active_profile_id.as_deref() == Some(id) {
            self.update_settings(json!({
                "active_profile_id": null,
                "active_profile_name": null,
            }))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PracticeKind;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_settings_exist_after_init() {
        let db = setup_db();
        let settings = db.settings().unwrap();
        assert_eq!(settings.id, schema::GLOBAL_SETTINGS_ID);
        assert_eq!(settings.practice_type, PracticeKind::Vet);
        assert!(settings.active_modules.contains(&"core".to_string()));
    }

    #[test]
    fn test_settings_recreated_when_missing() {
        let db = setup_db();
        db.remove_doc(schema::SETTINGS, schema::GLOBAL_SETTINGS_ID)
            .unwrap();

        let settings = db.settings().unwrap();
        assert_eq!(settings.theme, "light");
        assert!(db
            .exists_doc(schema::SETTINGS, schema::GLOBAL_SETTINGS_ID)
            .unwrap());
    }

    #[test]
    fn test_create_profile_activates_and_flattens() {
        let db = setup_db();
        let profile = db
            .create_profile(
                "Clínica Norte",
                ProfileInput {
                    clinic_name: Some("Clínica Norte LTDA".into()),
                    veterinarian_name: Some("Dra. Souza".into()),
                    crmv: Some("CRMV-SP 12345".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let settings = db.settings().unwrap();
        assert_eq!(settings.active_profile_id.as_deref(), Some(profile.id.as_str()));
        assert_eq!(settings.active_profile_name.as_deref(), Some("Clínica Norte"));
        assert_eq!(settings.clinic_name, "Clínica Norte LTDA");
        assert_eq!(settings.crmv.as_deref(), Some("CRMV-SP 12345"));
        // Default margins flow through the flattening.
        assert_eq!(settings.letterhead_margins_mm.unwrap().top, 30.0);
    }

    #[test]
    fn test_update_active_profile_reflattens() {
        let db = setup_db();
        let profile = db
            .create_profile("Base", ProfileInput::default())
            .unwrap();

        db.update_profile(&profile.id, json!({ "clinic_name": "Nova Sede" }))
            .unwrap();
        assert_eq!(db.settings().unwrap().clinic_name, "Nova Sede");
    }

    #[test]
    fn test_delete_active_profile_clears_reference() {
        let db = setup_db();
        let profile = db
            .create_profile("Base", ProfileInput::default())
            .unwrap();

        db.delete_profile(&profile.id).unwrap();
        let settings = db.settings().unwrap();
        assert_eq!(settings.active_profile_id, None);
        assert_eq!(settings.active_profile_name, None);
        assert!(db.profiles().unwrap().is_empty());
    }

    #[test]
    fn test_activate_missing_profile_fails() {
        let db = setup_db();
        let err = db.activate_profile("ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
