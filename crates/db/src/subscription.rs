//! Live queries.
//!
//! A [`Subscription`] runs one background task per query. The task delivers
//! an initial snapshot, then re-queries and pushes a fresh full snapshot each
//! time the store's change feed reports a write to the queried collection.
//! Sequence numbers strictly increase per subscription. Dropping the handle
//! (or calling [`Subscription::cancel`]) stops the task.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::store::{DocumentStore, Query, StoreError, StoredDocument};

/// Channel depth between the query task and the consumer.
const SNAPSHOT_BUFFER: usize = 16;

/// Full ordered contents of a collection at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub seq: u64,
    pub documents: Vec<StoredDocument>,
}

pub struct Subscription {
    query: Query,
    rx: mpsc::Receiver<Result<Snapshot, StoreError>>,
    cancel: CancellationToken,
}

impl Subscription {
    /// Start listening. Must be called inside a tokio runtime.
    pub fn start(store: Arc<dyn DocumentStore>, query: Query) -> Self {
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        let cancel = CancellationToken::new();
        tokio::spawn(run(store, query.clone(), tx, cancel.clone()));
        Self { query, rx, cancel }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Next snapshot, or the error that ended the subscription. `None` once
    /// the subscription is over.
    pub async fn next(&mut self) -> Option<Result<Snapshot, StoreError>> {
        self.rx.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    store: Arc<dyn DocumentStore>,
    query: Query,
    tx: mpsc::Sender<Result<Snapshot, StoreError>>,
    cancel: CancellationToken,
) {
    // Subscribe before the first read so no write can slip between them.
    let mut changes = store.changes();
    let mut seq = 0u64;
    let mut dirty = true;

    tracing::debug!(collection = %query.collection, "Subscription started");
    loop {
        if dirty {
            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = store.query(&query) => result,
            };
            match result {
                Ok(documents) => {
                    seq += 1;
                    if tx.send(Ok(Snapshot { seq, documents })).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(collection = %query.collection, error = %e, "Subscription query failed");
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            event = changes.recv() => match event {
                Ok(event) => dirty = query.matches(&event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(collection = %query.collection, missed, "Subscription lagged, re-querying");
                    dirty = true;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    tracing::debug!(collection = %query.collection, "Subscription ended");
}
