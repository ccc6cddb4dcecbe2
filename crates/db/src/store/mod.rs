//! The document store contract.
//!
//! A store holds flat collections of JSON object documents keyed by a
//! store-assigned id, plus singleton documents under well-known keys. Every
//! committed write is published as a [`DocumentEvent`] on the store's change
//! feed; subscriptions re-query on each matching event.
//!
//! Writes are last-write-wins: there is no version check.

mod clock;
mod memory;
mod postgres;

use std::cmp::Ordering as CmpOrdering;

use async_trait::async_trait;
use folio_core::content::{Collection, ContentItem, Ordering, RESERVED_KEYS};
use folio_core::error::CoreError;
use folio_core::types::{DocId, Timestamp};
use folio_events::DocumentEvent;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

pub use clock::ServerClock;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A document body: a JSON object.
pub type Document = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: DocId },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &DocId) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.clone(),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => CoreError::NotFound {
                entity: collection
                    .parse::<Collection>()
                    .map(Collection::entity)
                    .unwrap_or("Document"),
                id,
            },
            StoreError::InvalidDocument(msg) => CoreError::Validation(msg),
            other => CoreError::Internal(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Documents and queries
// ---------------------------------------------------------------------------

/// A document as persisted, with its store-owned metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocId,
    pub fields: Document,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StoredDocument {
    /// Wire shape: the fields plus `id` and `createdAt`.
    pub fn to_json(&self) -> Value {
        let mut body = self.fields.clone();
        body.insert("id".into(), Value::String(self.id.to_string()));
        body.insert(
            "createdAt".into(),
            serde_json::to_value(self.created_at).unwrap_or(Value::Null),
        );
        Value::Object(body)
    }

    /// Decode the fields into a typed content item.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<ContentItem<T>, serde_json::Error> {
        Ok(ContentItem {
            id: self.id.clone(),
            created_at: Some(self.created_at),
            fields: serde_json::from_value(Value::Object(self.fields.clone()))?,
        })
    }
}

/// A collection query: which collection and in what order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub ordering: Ordering,
}

impl Query {
    pub fn new(collection: impl Into<String>, ordering: Ordering) -> Self {
        Self {
            collection: collection.into(),
            ordering,
        }
    }

    /// The collection with its default ordering.
    pub fn collection(collection: Collection) -> Self {
        Self::new(collection.name(), collection.ordering())
    }

    pub fn matches(&self, event: &DocumentEvent) -> bool {
        event.collection == self.collection
    }
}

/// Serialize a value into a document body. Fails for non-object values.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Remove store-owned keys (`id`, `createdAt`) from caller input.
pub fn strip_reserved(fields: &mut Document) {
    for key in RESERVED_KEYS {
        fields.remove(*key);
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Total order on optional field values. Missing and `null` sort lowest.
pub(crate) fn compare_field(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

/// Storage backend for documents. Implementations publish a
/// [`DocumentEvent`] for every committed write.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection in the requested order.
    async fn query(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError>;

    async fn get(&self, collection: &str, id: &DocId)
        -> Result<Option<StoredDocument>, StoreError>;

    /// Insert with a fresh id and server timestamp. Reserved keys in
    /// `fields` are ignored.
    async fn add(&self, collection: &str, fields: Document) -> Result<StoredDocument, StoreError>;

    /// Overwrite the named fields of an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &DocId,
        fields: Document,
    ) -> Result<StoredDocument, StoreError>;

    async fn delete(&self, collection: &str, id: &DocId) -> Result<(), StoreError>;

    /// Write a document under a caller-chosen key, creating it if absent.
    /// With `merge` the fields are merged into the existing body, otherwise
    /// they replace it.
    async fn set(
        &self,
        collection: &str,
        id: &DocId,
        fields: Document,
        merge: bool,
    ) -> Result<StoredDocument, StoreError>;

    /// Change feed of committed writes.
    fn changes(&self) -> broadcast::Receiver<DocumentEvent>;
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn strip_reserved_removes_only_store_keys() {
        let mut doc = to_document(&json!({"id": "x", "createdAt": 1, "title": "t"})).unwrap();
        strip_reserved(&mut doc);
        assert_eq!(Value::Object(doc), json!({"title": "t"}));
    }

    #[test]
    fn to_document_rejects_non_objects() {
        assert_matches!(to_document(&json!([1, 2])), Err(StoreError::InvalidDocument(_)));
    }

    #[test]
    fn missing_values_sort_lowest() {
        let a = json!("2024-01");
        assert_eq!(compare_field(None, Some(&a)), CmpOrdering::Less);
        assert_eq!(compare_field(Some(&Value::Null), None), CmpOrdering::Equal);
        assert_eq!(
            compare_field(Some(&json!("2023-12")), Some(&a)),
            CmpOrdering::Less
        );
        assert_eq!(compare_field(Some(&json!(10)), Some(&json!(9))), CmpOrdering::Greater);
    }

    #[test]
    fn store_not_found_maps_to_entity_name() {
        let err = CoreError::from(StoreError::not_found("projects", &DocId::new("p")));
        assert_eq!(err.to_string(), "Entity not found: Project with id p");
    }

    #[test]
    fn to_json_includes_metadata() {
        let now = chrono::Utc::now();
        let doc = StoredDocument {
            id: DocId::new("a"),
            fields: to_document(&json!({"title": "t"})).unwrap(),
            created_at: now,
            updated_at: now,
        };
        let json = doc.to_json();
        assert_eq!(json["id"], "a");
        assert_eq!(json["title"], "t");
        assert!(json["createdAt"].is_string());
    }
}
