//! Live View Binder.
//!
//! A [`LiveView`] owns one [`Subscription`] for as long as the view is
//! mounted and publishes its state through a `watch` channel:
//!
//! - the bound list is replaced wholesale on every snapshot;
//! - `loading` is cleared by the first snapshot or by a failure;
//! - a subscription error moves the view to [`SubscriptionStatus::Failed`]
//!   and is not retried;
//! - after teardown (explicit [`LiveView::unmount`] or drop) snapshots are
//!   ignored and the subscription is released.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use folio_core::content::{ContentItem, ContentKind};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::store::{DocumentStore, Query};
use crate::subscription::{Snapshot, Subscription};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Unsubscribed,
    Subscribing,
    Subscribed,
    Failed(String),
}

#[derive(Debug)]
pub struct ViewState<T> {
    pub status: SubscriptionStatus,
    pub items: Arc<Vec<ContentItem<T>>>,
    pub loading: bool,
    /// Sequence number of the snapshot `items` came from; 0 before the first.
    pub seq: u64,
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status.clone(),
            items: Arc::clone(&self.items),
            loading: self.loading,
            seq: self.seq,
        }
    }
}

impl<T> ViewState<T> {
    fn subscribing() -> Self {
        Self {
            status: SubscriptionStatus::Subscribing,
            items: Arc::new(Vec::new()),
            loading: true,
            seq: 0,
        }
    }
}

pub struct LiveView<T> {
    state: watch::Receiver<ViewState<T>>,
    mounted: Arc<AtomicBool>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    _kind: PhantomData<fn() -> T>,
}

impl<T: ContentKind> LiveView<T> {
    /// Mount a view over the kind's collection in its default order.
    pub fn mount(store: Arc<dyn DocumentStore>) -> Self {
        Self::mount_query(store, Query::collection(T::COLLECTION))
    }
}

impl<T> LiveView<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Mount a view over an arbitrary query. Documents whose fields do not
    /// decode as `T` are skipped with a warning.
    pub fn mount_query(store: Arc<dyn DocumentStore>, query: Query) -> Self {
        let (state_tx, state_rx) = watch::channel(ViewState::subscribing());
        let mounted = Arc::new(AtomicBool::new(true));
        let cancel = CancellationToken::new();
        let subscription = Subscription::start(store, query);

        let task = tokio::spawn(bind(
            subscription,
            state_tx,
            Arc::clone(&mounted),
            cancel.clone(),
        ));

        Self {
            state: state_rx,
            mounted,
            cancel,
            task: Some(task),
            _kind: PhantomData,
        }
    }

    /// Current state.
    pub fn state(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    /// A receiver that observes every state change.
    pub fn watch(&self) -> watch::Receiver<ViewState<T>> {
        self.state.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Wait until the state satisfies `pred`. Returns `None` if the view's
    /// task ended first without satisfying it.
    pub async fn wait_for<F>(&mut self, mut pred: F) -> Option<ViewState<T>>
    where
        F: FnMut(&ViewState<T>) -> bool,
    {
        let reached = self
            .state
            .wait_for(|s| pred(s))
            .await
            .map(|state| state.clone());
        match reached {
            Ok(state) => Some(state),
            Err(_) => {
                let state = self.state.borrow().clone();
                pred(&state).then_some(state)
            }
        }
    }

    /// Tear the view down and wait for the subscription to be released.
    pub async fn unmount(mut self) {
        self.mounted.store(false, Ordering::Release);
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Live view task ended abnormally");
            }
        }
    }
}

impl<T> Drop for LiveView<T> {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::Release);
        self.cancel.cancel();
    }
}

async fn bind<T>(
    mut subscription: Subscription,
    state: watch::Sender<ViewState<T>>,
    mounted: Arc<AtomicBool>,
    cancel: CancellationToken,
) where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let collection = subscription.query().collection.clone();
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => None,
            next = subscription.next() => next,
        };
        if !mounted.load(Ordering::Acquire) {
            break;
        }
        match next {
            Some(Ok(snapshot)) => {
                let seq = snapshot.seq;
                let items = decode_snapshot::<T>(&collection, snapshot);
                state.send_modify(|s| {
                    s.status = SubscriptionStatus::Subscribed;
                    s.items = Arc::new(items);
                    s.loading = false;
                    s.seq = seq;
                });
            }
            Some(Err(e)) => {
                tracing::error!(%collection, error = %e, "Live view subscription failed");
                state.send_modify(|s| {
                    s.status = SubscriptionStatus::Failed(e.to_string());
                    s.loading = false;
                });
                return;
            }
            None => break,
        }
    }

    subscription.cancel();
    state.send_modify(|s| {
        if !matches!(s.status, SubscriptionStatus::Failed(_)) {
            s.status = SubscriptionStatus::Unsubscribed;
        }
    });
}

fn decode_snapshot<T: DeserializeOwned>(collection: &str, snapshot: Snapshot) -> Vec<ContentItem<T>> {
    snapshot
        .documents
        .iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(collection, id = %doc.id, error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}
