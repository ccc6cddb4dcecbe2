//! The `settings/profile` singleton.

use std::sync::Arc;

use folio_core::content::profile::{ProfileSettings, PROFILE_COLLECTION, PROFILE_KEY};
use folio_core::types::DocId;

use crate::store::{to_document, Document, DocumentStore, StoreError};

pub struct ProfileRepo {
    store: Arc<dyn DocumentStore>,
}

impl ProfileRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn key() -> DocId {
        DocId::new(PROFILE_KEY)
    }

    /// The stored profile, or an all-blank one if it was never saved.
    pub async fn get(&self) -> Result<ProfileSettings, StoreError> {
        match self.store.get(PROFILE_COLLECTION, &Self::key()).await? {
            Some(doc) => Ok(serde_json::from_value(serde_json::Value::Object(doc.fields))?),
            None => Ok(ProfileSettings::default()),
        }
    }

    /// Merge-write every profile field.
    pub async fn save(&self, profile: &ProfileSettings) -> Result<ProfileSettings, StoreError> {
        self.merge(to_document(profile)?).await
    }

    /// Merge-write only the profile fields present in `patch`. Unknown keys
    /// are dropped; values must have the profile's types.
    pub async fn merge(&self, patch: Document) -> Result<ProfileSettings, StoreError> {
        let known = to_document(&ProfileSettings::default())?;
        let patch: Document = patch
            .into_iter()
            .filter(|(key, _)| known.contains_key(key))
            .collect();
        serde_json::from_value::<ProfileSettings>(serde_json::Value::Object(patch.clone()))
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;

        let doc = self
            .store
            .set(PROFILE_COLLECTION, &Self::key(), patch, true)
            .await?;
        tracing::info!("Profile settings saved");
        Ok(serde_json::from_value(serde_json::Value::Object(doc.fields))?)
    }
}
