use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use folio_core::content::profile::{ProfileSettings, PROFILE_COLLECTION, PROFILE_KEY};
use folio_core::content::{
    Certificate, Collection, ContactMessage, ContentKind, DesignAsset, Direction, Experience,
    Ordering, Project, Skill,
};
use folio_core::live::{ClientMessage, LiveTarget, ServerMessage};
use folio_db::{DocumentStore, LiveView, Query, SubscriptionStatus, ViewState};
use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::state::AppState;
use crate::ws::manager::WsSender;

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn send(sender: &WsSender, message: &ServerMessage) -> bool {
    match serde_json::to_string(message) {
        Ok(text) => sender.send(Message::Text(text.into())).is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode live message");
            true
        }
    }
}

fn send_error(sender: &WsSender, collection: Option<String>, message: String) {
    send(sender, &ServerMessage::Error { collection, message });
}

/// Mount a live view over `collection` and push every new snapshot to
/// `sender` as a [`ServerMessage::Snapshot`].
///
/// Items are decoded as the collection's content kind, so a live client sees
/// exactly what `GET /api/v1/content/{collection}` returns: legacy values
/// normalised, display defaults filled in, undecodable documents skipped.
///
/// A subscription failure is reported once as [`ServerMessage::Error`] and
/// ends the forwarder. Aborting the returned task drops the view, which
/// releases the subscription.
pub fn spawn_snapshot_forwarder(
    store: Arc<dyn DocumentStore>,
    collection: Collection,
    sender: WsSender,
) -> JoinHandle<()> {
    match collection {
        Collection::Experience => forward_collection::<Experience>(store, sender),
        Collection::Projects => forward_collection::<Project>(store, sender),
        Collection::Skills => forward_collection::<Skill>(store, sender),
        Collection::Certificates => forward_collection::<Certificate>(store, sender),
        Collection::Designs => forward_collection::<DesignAsset>(store, sender),
        Collection::Messages => forward_collection::<ContactMessage>(store, sender),
    }
}

/// Push the owner profile as a [`ServerMessage::Profile`] now and after
/// every write to the `settings/profile` singleton.
pub fn spawn_profile_forwarder(store: Arc<dyn DocumentStore>, sender: WsSender) -> JoinHandle<()> {
    let query = Query::new(PROFILE_COLLECTION, Ordering::created_at(Direction::Asc));
    let view = LiveView::<ProfileSettings>::mount_query(store, query);

    spawn_forwarder(view, sender, LiveTarget::Profile, |state| {
        let profile = state
            .items
            .iter()
            .find(|item| item.id.as_str() == PROFILE_KEY)
            .map(|item| item.fields.clone())
            .unwrap_or_default();
        ServerMessage::Profile {
            seq: state.seq,
            profile: serde_json::to_value(profile).unwrap_or_default(),
        }
    })
}

/// Start the forwarder for any [`LiveTarget`].
pub fn spawn_target_forwarder(
    store: Arc<dyn DocumentStore>,
    target: LiveTarget,
    sender: WsSender,
) -> JoinHandle<()> {
    match target {
        LiveTarget::Collection(collection) => spawn_snapshot_forwarder(store, collection, sender),
        LiveTarget::Profile => spawn_profile_forwarder(store, sender),
    }
}

fn forward_collection<T: ContentKind>(store: Arc<dyn DocumentStore>, sender: WsSender) -> JoinHandle<()> {
    let view = LiveView::<T>::mount(store);
    let collection = T::COLLECTION;

    spawn_forwarder(view, sender, LiveTarget::Collection(collection), move |state| {
        let items = state
            .items
            .iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .collect();
        ServerMessage::Snapshot {
            collection: collection.name().to_string(),
            seq: state.seq,
            items,
        }
    })
}

fn spawn_forwarder<T, F>(
    view: LiveView<T>,
    sender: WsSender,
    target: LiveTarget,
    render: F,
) -> JoinHandle<()>
where
    T: DeserializeOwned + Send + Sync + 'static,
    F: Fn(&ViewState<T>) -> ServerMessage + Send + 'static,
{
    let mut states = view.watch();

    tokio::spawn(async move {
        // Owned by the task so the subscription lives exactly as long as it.
        let _view = view;
        let mut last_seq = 0;

        loop {
            let state = states.borrow_and_update().clone();
            match &state.status {
                SubscriptionStatus::Subscribed if state.seq > last_seq => {
                    last_seq = state.seq;
                    if !send(&sender, &render(&state)) {
                        break;
                    }
                }
                SubscriptionStatus::Failed(message) => {
                    send_error(&sender, Some(target.name().to_string()), message.clone());
                    break;
                }
                _ => {}
            }

            if states.changed().await.is_err() {
                break;
            }
        }
    })
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers the connection, spawns a sender task fed by the manager
/// channel, then dispatches inbound subscribe/unsubscribe messages until
/// the client disconnects. Every live subscription is released on exit.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = state.ws_manager.add(conn_id.clone()).await;
    let Some(outbound) = state.ws_manager.sender(&conn_id).await else {
        return;
    };

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    let mut subscriptions: HashMap<LiveTarget, JoinHandle<()>> = HashMap::new();

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(ClientMessage::Subscribe { collection }) => {
                    match collection.parse::<LiveTarget>() {
                        Ok(target) if target.is_public() => {
                            let forwarder = spawn_target_forwarder(
                                Arc::clone(&state.store),
                                target,
                                outbound.clone(),
                            );
                            if let Some(previous) = subscriptions.insert(target, forwarder) {
                                previous.abort();
                            }
                            tracing::debug!(conn_id = %conn_id, %target, "Live subscription opened");
                        }
                        Ok(target) => send_error(
                            &outbound,
                            Some(collection),
                            format!("Collection '{target}' is not public"),
                        ),
                        Err(message) => send_error(&outbound, Some(collection), message),
                    }
                }
                Ok(ClientMessage::Unsubscribe { collection }) => {
                    if let Some(forwarder) = collection
                        .parse::<LiveTarget>()
                        .ok()
                        .and_then(|target| subscriptions.remove(&target))
                    {
                        forwarder.abort();
                        tracing::debug!(conn_id = %conn_id, collection = %collection, "Live subscription closed");
                    }
                }
                Err(e) => send_error(&outbound, None, format!("Invalid message: {e}")),
            },
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    for (_, forwarder) in subscriptions.drain() {
        forwarder.abort();
    }
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
