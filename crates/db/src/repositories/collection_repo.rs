//! CRUD for one content collection with its default ordering.

use std::marker::PhantomData;
use std::sync::Arc;

use folio_core::content::{ContentItem, ContentKind};
use folio_core::types::DocId;

use crate::store::{to_document, DocumentStore, Query, StoreError};

pub struct CollectionRepo<T> {
    store: Arc<dyn DocumentStore>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Clone for CollectionRepo<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _kind: PhantomData,
        }
    }
}

impl<T: ContentKind> CollectionRepo<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    fn collection(&self) -> &'static str {
        T::COLLECTION.name()
    }

    /// All items in the collection's default order. Documents that no longer
    /// decode as `T` are skipped with a warning.
    pub async fn list(&self) -> Result<Vec<ContentItem<T>>, StoreError> {
        let docs = self.store.query(&Query::collection(T::COLLECTION)).await?;
        Ok(docs
            .iter()
            .filter_map(|doc| match doc.decode::<T>() {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(collection = self.collection(), id = %doc.id, error = %e, "Skipping undecodable document");
                    None
                }
            })
            .collect())
    }

    pub async fn get(&self, id: &DocId) -> Result<ContentItem<T>, StoreError> {
        let doc = self
            .store
            .get(self.collection(), id)
            .await?
            .ok_or_else(|| StoreError::not_found(self.collection(), id))?;
        Ok(doc.decode()?)
    }

    /// Insert a new item. The store assigns the id and `createdAt`.
    pub async fn create(&self, fields: &T) -> Result<ContentItem<T>, StoreError> {
        let doc = self.store.add(self.collection(), to_document(fields)?).await?;
        tracing::info!(collection = self.collection(), id = %doc.id, "Content created");
        Ok(doc.decode()?)
    }

    /// Overwrite every editable field of an existing item.
    pub async fn update(&self, id: &DocId, fields: &T) -> Result<ContentItem<T>, StoreError> {
        let doc = self
            .store
            .update(self.collection(), id, to_document(fields)?)
            .await?;
        tracing::info!(collection = self.collection(), id = %id, "Content updated");
        Ok(doc.decode()?)
    }

    pub async fn delete(&self, id: &DocId) -> Result<(), StoreError> {
        self.store.delete(self.collection(), id).await?;
        tracing::info!(collection = self.collection(), id = %id, "Content deleted");
        Ok(())
    }
}
