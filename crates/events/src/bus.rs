//! In-process change feed backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the document store
//! (publisher) and every live subscription (receivers).

use chrono::{DateTime, Utc};
use folio_core::types::DocId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// DocumentEvent
// ---------------------------------------------------------------------------

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// A committed write to one document.
///
/// Constructed via [`DocumentEvent::new`] and enriched with
/// [`with_payload`](DocumentEvent::with_payload) and
/// [`with_origin`](DocumentEvent::with_origin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEvent {
    pub kind: ChangeKind,

    /// Collection the document lives in, e.g. `"projects"` or `"settings"`.
    pub collection: String,

    pub document_id: DocId,

    /// Fields written, when the publisher has them at hand. Receivers must not
    /// rely on it; subscriptions always re-query.
    pub payload: serde_json::Value,

    /// Id of the process that committed the write. Used to drop echoes of
    /// our own writes coming back through a cross-instance channel.
    pub origin: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl DocumentEvent {
    pub fn new(kind: ChangeKind, collection: impl Into<String>, document_id: DocId) -> Self {
        Self {
            kind,
            collection: collection.into(),
            document_id,
            payload: serde_json::Value::Null,
            origin: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Dot-separated event name, e.g. `"document.created"`.
    pub fn event_type(&self) -> String {
        format!("document.{}", self.kind.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus.
///
/// ```rust
/// use folio_core::types::DocId;
/// use folio_events::bus::{ChangeKind, DocumentEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DocumentEvent::new(ChangeKind::Created, "projects", DocId::new("p1")));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DocumentEvent>,
}

impl EventBus {
    /// When the buffer is full the oldest events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: DocumentEvent) {
        tracing::trace!(
            event_type = %event.event_type(),
            collection = %event.collection,
            id = %event.document_id,
            "Publishing document event"
        );
        // SendError only means there are no receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
