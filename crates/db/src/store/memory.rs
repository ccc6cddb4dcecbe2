//! In-process document store. Used by tests and single-node development
//! runs without `DATABASE_URL`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use folio_core::content::{Direction, OrderBy};
use folio_core::types::DocId;
use folio_events::{ChangeKind, DocumentEvent, EventBus};
use tokio::sync::{broadcast, RwLock};

use super::{
    compare_field, strip_reserved, Document, DocumentStore, Query, ServerClock, StoreError,
    StoredDocument,
};

/// Collections keep insertion order so that equal sort keys come back in a
/// stable order.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
    clock: ServerClock,
    bus: Arc<EventBus>,
}

impl MemoryStore {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            clock: ServerClock::default(),
            bus,
        }
    }

    fn publish(&self, kind: ChangeKind, collection: &str, doc: &StoredDocument) {
        self.bus.publish(
            DocumentEvent::new(kind, collection, doc.id.clone())
                .with_payload(serde_json::Value::Object(doc.fields.clone())),
        );
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(EventBus::default()))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs = collections
            .get(&query.collection)
            .cloned()
            .unwrap_or_default();
        drop(collections);

        match &query.ordering.order_by {
            OrderBy::CreatedAt => docs.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            OrderBy::Field(name) => {
                docs.sort_by(|a, b| compare_field(a.fields.get(name), b.fields.get(name)))
            }
        }
        if query.ordering.direction == Direction::Desc {
            docs.reverse();
        }
        Ok(docs)
    }

    async fn get(
        &self,
        collection: &str,
        id: &DocId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| &d.id == id))
            .cloned())
    }

    async fn add(
        &self,
        collection: &str,
        mut fields: Document,
    ) -> Result<StoredDocument, StoreError> {
        strip_reserved(&mut fields);
        let now = self.clock.now();
        let doc = StoredDocument {
            id: DocId::new(uuid::Uuid::now_v7().simple().to_string()),
            fields,
            created_at: now,
            updated_at: now,
        };
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());

        tracing::debug!(collection, id = %doc.id, "Document created");
        self.publish(ChangeKind::Created, collection, &doc);
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocId,
        mut fields: Document,
    ) -> Result<StoredDocument, StoreError> {
        strip_reserved(&mut fields);
        let updated = {
            let mut collections = self.collections.write().await;
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            doc.fields.extend(fields);
            doc.updated_at = self.clock.now();
            doc.clone()
        };

        tracing::debug!(collection, id = %id, "Document updated");
        self.publish(ChangeKind::Updated, collection, &updated);
        Ok(updated)
    }

    async fn delete(&self, collection: &str, id: &DocId) -> Result<(), StoreError> {
        let removed = {
            let mut collections = self.collections.write().await;
            let docs = collections
                .get_mut(collection)
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            let index = docs
                .iter()
                .position(|d| &d.id == id)
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            docs.remove(index)
        };

        tracing::debug!(collection, id = %id, "Document deleted");
        self.bus
            .publish(DocumentEvent::new(ChangeKind::Deleted, collection, removed.id));
        Ok(())
    }

    async fn set(
        &self,
        collection: &str,
        id: &DocId,
        mut fields: Document,
        merge: bool,
    ) -> Result<StoredDocument, StoreError> {
        strip_reserved(&mut fields);
        let now = self.clock.now();
        let (doc, kind) = {
            let mut collections = self.collections.write().await;
            let docs = collections.entry(collection.to_string()).or_default();
            match docs.iter_mut().find(|d| &d.id == id) {
                Some(existing) => {
                    if merge {
                        existing.fields.extend(fields);
                    } else {
                        existing.fields = fields;
                    }
                    existing.updated_at = now;
                    (existing.clone(), ChangeKind::Updated)
                }
                None => {
                    let doc = StoredDocument {
                        id: id.clone(),
                        fields,
                        created_at: now,
                        updated_at: now,
                    };
                    docs.push(doc.clone());
                    (doc, ChangeKind::Created)
                }
            }
        };

        tracing::debug!(collection, id = %id, merge, "Document set");
        self.publish(kind, collection, &doc);
        Ok(doc)
    }

    fn changes(&self) -> broadcast::Receiver<DocumentEvent> {
        self.bus.subscribe()
    }
}
