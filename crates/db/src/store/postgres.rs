//! PostgreSQL document store.
//!
//! All collections share the `documents` table (see `migrations/`). Writes
//! are published on the local [`EventBus`] and announced to other instances
//! with `pg_notify`; [`PgDocumentStore::spawn_change_listener`] relays
//! announcements from other instances onto the local bus.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_core::content::{Direction, OrderBy};
use folio_core::types::{DocId, Timestamp};
use folio_events::{ChangeKind, DocumentEvent, EventBus};
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::{strip_reserved, Document, DocumentStore, Query, ServerClock, StoreError, StoredDocument};

/// `pg_notify` channel carrying [`DocumentEvent`]s between instances.
pub const CHANGE_CHANNEL: &str = "folio_documents";

/// Column list for `documents` queries.
const DOCUMENT_COLUMNS: &str = "id, fields, created_at, updated_at";

/// Back-off after the listener connection fails.
const LISTENER_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    fields: Json<Document>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        StoredDocument {
            id: DocId::new(row.id),
            fields: row.fields.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    doc: DocumentRow,
    inserted: bool,
}

pub struct PgDocumentStore {
    pool: PgPool,
    clock: ServerClock,
    bus: Arc<EventBus>,
    /// Identifies this process in `pg_notify` payloads.
    instance_id: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, bus: Arc<EventBus>) -> Self {
        Self {
            pool,
            clock: ServerClock::default(),
            bus,
            instance_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Publish locally, then announce to other instances. A failed
    /// announcement is logged; the write itself has committed.
    async fn announce(&self, event: DocumentEvent) {
        let event = event.with_origin(self.instance_id.clone());
        match serde_json::to_string(&event) {
            Ok(payload) => {
                if let Err(e) = sqlx::query("SELECT pg_notify($1, $2)")
                    .bind(CHANGE_CHANNEL)
                    .bind(payload)
                    .execute(&self.pool)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to announce document change");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode document change"),
        }
        self.bus.publish(event);
    }

    /// Relay changes committed by other instances onto the local bus until
    /// `cancel` fires.
    pub fn spawn_change_listener(&self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        let pool = self.pool.clone();
        let bus = Arc::clone(&self.bus);
        let instance_id = self.instance_id.clone();

        tokio::spawn(async move {
            tracing::info!(channel = CHANGE_CHANNEL, "Document change listener started");
            loop {
                let mut listener = match PgListener::connect_with(&pool).await {
                    Ok(l) => l,
                    Err(e) => {
                        tracing::error!(error = %e, "Change listener failed to connect");
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            _ = tokio::time::sleep(LISTENER_RETRY_DELAY) => continue,
                        }
                    }
                };
                if let Err(e) = listener.listen(CHANGE_CHANNEL).await {
                    tracing::error!(error = %e, "Change listener failed to LISTEN");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(LISTENER_RETRY_DELAY) => continue,
                    }
                }

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            tracing::info!("Document change listener stopped");
                            return;
                        }
                        received = listener.recv() => match received {
                            Ok(notification) => {
                                match serde_json::from_str::<DocumentEvent>(notification.payload()) {
                                    Ok(event) if event.origin.as_deref() == Some(instance_id.as_str()) => {}
                                    Ok(event) => bus.publish(event),
                                    Err(e) => tracing::warn!(error = %e, "Ignoring malformed change notification"),
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Change listener connection lost");
                                break;
                            }
                        }
                    }
                }
            }
            tracing::info!("Document change listener stopped");
        })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn query(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = match &query.ordering.order_by {
            OrderBy::CreatedAt => {
                let dir = sql_direction(query.ordering.direction);
                let sql = format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents \
                     WHERE collection = $1 ORDER BY created_at {dir}"
                );
                sqlx::query_as::<_, DocumentRow>(&sql)
                    .bind(&query.collection)
                    .fetch_all(&self.pool)
                    .await?
            }
            OrderBy::Field(name) => {
                let nulls = match query.ordering.direction {
                    Direction::Asc => "ASC NULLS FIRST",
                    Direction::Desc => "DESC NULLS LAST",
                };
                let sql = format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents \
                     WHERE collection = $1 \
                     ORDER BY fields ->> $2 {nulls}, created_at ASC"
                );
                sqlx::query_as::<_, DocumentRow>(&sql)
                    .bind(&query.collection)
                    .bind(name)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }

    async fn get(
        &self,
        collection: &str,
        id: &DocId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE collection = $1 AND id = $2"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(collection)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(StoredDocument::from))
    }

    async fn add(
        &self,
        collection: &str,
        mut fields: Document,
    ) -> Result<StoredDocument, StoreError> {
        strip_reserved(&mut fields);
        let now = self.clock.now();
        let id = uuid::Uuid::now_v7().simple().to_string();
        let sql = format!(
            "INSERT INTO documents (collection, id, fields, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {DOCUMENT_COLUMNS}"
        );
        let doc: StoredDocument = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(collection)
            .bind(&id)
            .bind(Json(&fields))
            .bind(now)
            .fetch_one(&self.pool)
            .await?
            .into();

        tracing::debug!(collection, id = %doc.id, "Document created");
        self.announce(DocumentEvent::new(ChangeKind::Created, collection, doc.id.clone()))
            .await;
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocId,
        mut fields: Document,
    ) -> Result<StoredDocument, StoreError> {
        strip_reserved(&mut fields);
        let sql = format!(
            "UPDATE documents SET fields = fields || $3, updated_at = $4 \
             WHERE collection = $1 AND id = $2 RETURNING {DOCUMENT_COLUMNS}"
        );
        let doc: StoredDocument = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(collection)
            .bind(id.as_str())
            .bind(Json(&fields))
            .bind(self.clock.now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, id))?
            .into();

        tracing::debug!(collection, id = %id, "Document updated");
        self.announce(DocumentEvent::new(ChangeKind::Updated, collection, id.clone()))
            .await;
        Ok(doc)
    }

    async fn delete(&self, collection: &str, id: &DocId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }

        tracing::debug!(collection, id = %id, "Document deleted");
        self.announce(DocumentEvent::new(ChangeKind::Deleted, collection, id.clone()))
            .await;
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
        let on_conflict = if merge {
            "documents.fields || EXCLUDED.fields"
        } else {
            "EXCLUDED.fields"
        };
        let sql = format!(
            "INSERT INTO documents (collection, id, fields, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) \
             ON CONFLICT (collection, id) DO UPDATE \
             SET fields = {on_conflict}, updated_at = EXCLUDED.updated_at \
             RETURNING {DOCUMENT_COLUMNS}, (xmax = 0) AS inserted"
        );
        let row = sqlx::query_as::<_, UpsertRow>(&sql)
            .bind(collection)
            .bind(id.as_str())
            .bind(Json(&fields))
            .bind(self.clock.now())
            .fetch_one(&self.pool)
            .await?;

        let kind = if row.inserted {
            ChangeKind::Created
        } else {
            ChangeKind::Updated
        };
        tracing::debug!(collection, id = %id, merge, "Document set");
        self.announce(DocumentEvent::new(kind, collection, id.clone()))
            .await;
        Ok(row.doc.into())
    }

    fn changes(&self) -> broadcast::Receiver<DocumentEvent> {
        self.bus.subscribe()
    }
}

fn sql_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Asc => "ASC",
        Direction::Desc => "DESC",
    }
}
