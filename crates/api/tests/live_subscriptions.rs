//! Snapshot forwarding behind the `/api/v1/ws` endpoint.
//!
//! Drives the forwarders directly with an in-memory store and a plain
//! channel in place of the socket.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use axum::http::StatusCode;
use common::{body_json, get, login, put_json_auth};
use folio_api::ws::{spawn_profile_forwarder, spawn_snapshot_forwarder, spawn_target_forwarder};
use folio_core::content::{Collection, Experience, ExperienceType};
use folio_core::live::{LiveTarget, ServerMessage};
use folio_db::store::to_document;
use folio_db::{CollectionRepo, DocumentStore, MemoryStore};
use folio_events::EventBus;
use serde_json::{json, Value};
use tokio::sync::mpsc;

fn memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new(Arc::new(EventBus::default())))
}

async fn next_message(rx: &mut mpsc::UnboundedReceiver<Message>) -> ServerMessage {
    let frame = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a live message")
        .expect("forwarder channel closed");
    match frame {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("Expected a text frame, got {other:?}"),
    }
}

fn intern() -> Experience {
    Experience {
        experience_type: ExperienceType::Work,
        role: "Intern".into(),
        organization: "Acme".into(),
        start_date: "2024-06".into(),
        end_date: String::new(),
        is_current: true,
        description: "Summer internship".into(),
    }
}

#[tokio::test]
async fn first_snapshot_then_one_per_write() {
    let store = memory_store();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let forwarder = spawn_snapshot_forwarder(Arc::clone(&store), Collection::Experience, tx);

    match next_message(&mut rx).await {
        ServerMessage::Snapshot { collection, seq, items } => {
            assert_eq!(collection, "experience");
            assert_eq!(seq, 1);
            assert!(items.is_empty());
        }
        other => panic!("Expected snapshot, got {other:?}"),
    }

    let repo = CollectionRepo::<Experience>::new(Arc::clone(&store));
    let created = repo.create(&intern()).await.unwrap();

    match next_message(&mut rx).await {
        ServerMessage::Snapshot { seq, items, .. } => {
            assert!(seq > 1);
            assert_eq!(items.len(), 1);
            assert_eq!(items[0]["id"], created.id.as_str());
            assert_eq!(items[0]["role"], "Intern");
            assert_eq!(items[0]["isCurrent"], true);
        }
        other => panic!("Expected snapshot, got {other:?}"),
    }

    forwarder.abort();
}

#[tokio::test]
async fn writes_to_other_collections_do_not_push() {
    let store = memory_store();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let forwarder = spawn_snapshot_forwarder(Arc::clone(&store), Collection::Skills, tx);

    assert!(matches!(next_message(&mut rx).await, ServerMessage::Snapshot { .. }));

    CollectionRepo::<Experience>::new(Arc::clone(&store))
        .create(&intern())
        .await
        .unwrap();

    let pushed = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(pushed.is_err(), "no snapshot expected for an unrelated write");

    forwarder.abort();
}

#[tokio::test]
async fn aborting_the_forwarder_releases_the_subscription() {
    let bus = Arc::new(EventBus::default());
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new(Arc::clone(&bus)));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let forwarder = spawn_snapshot_forwarder(Arc::clone(&store), Collection::Designs, tx);

    assert!(matches!(next_message(&mut rx).await, ServerMessage::Snapshot { .. }));
    assert!(bus.receiver_count() >= 1);

    forwarder.abort();
    let _ = forwarder.await;

    // The subscription task notices cancellation and drops its receiver.
    tokio::time::timeout(Duration::from_secs(5), async {
        while bus.receiver_count() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("change feed receiver was not released");

    // The channel closes once the forwarder is gone.
    assert!(rx.recv().await.is_none());
}

async fn snapshot_items(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<Value> {
    match next_message(rx).await {
        ServerMessage::Snapshot { items, .. } => items,
        other => panic!("Expected snapshot, got {other:?}"),
    }
}

async fn seed(store: &Arc<dyn DocumentStore>, collection: &str, body: Value) {
    store.add(collection, to_document(&body).unwrap()).await.unwrap();
}

// ---------------------------------------------------------------------------
// Live and REST agree
// ---------------------------------------------------------------------------

#[tokio::test]
async fn live_experience_snapshot_matches_public_list() {
    let app = common::build_test_app();
    seed(
        &app.store,
        "experience",
        json!({
            "type": "volunteer",
            "role": "Mentor",
            "organization": "Code Club",
            "startDate": "2023-01",
            "description": "Weekly sessions",
        }),
    )
    .await;
    // Not an experience entry at all.
    seed(&app.store, "experience", json!({ "role": 42 })).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let forwarder = spawn_snapshot_forwarder(Arc::clone(&app.store), Collection::Experience, tx);
    let live = snapshot_items(&mut rx).await;

    let rest = body_json(get(app.app(), "/api/v1/content/experience").await).await;
    assert_eq!(Value::Array(live.clone()), rest["data"]["items"]);

    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["type"], "volunteering");
    assert_eq!(live[0]["endDate"], "");
    assert_eq!(live[0]["isCurrent"], false);

    forwarder.abort();
}

#[tokio::test]
async fn live_skill_snapshot_fills_display_defaults() {
    let app = common::build_test_app();
    seed(&app.store, "skills", json!({ "name": "Figma", "type": "tool" })).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let forwarder = spawn_snapshot_forwarder(Arc::clone(&app.store), Collection::Skills, tx);
    let live = snapshot_items(&mut rx).await;

    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["iconName"], "Code2");
    assert_eq!(live[0]["color"], "text-white");

    let rest = body_json(get(app.app(), "/api/v1/content/skills").await).await;
    assert_eq!(Value::Array(live), rest["data"]["items"]);

    forwarder.abort();
}

// ---------------------------------------------------------------------------
// Profile feed
// ---------------------------------------------------------------------------

async fn next_profile(rx: &mut mpsc::UnboundedReceiver<Message>) -> (u64, Value) {
    match next_message(rx).await {
        ServerMessage::Profile { seq, profile } => (seq, profile),
        other => panic!("Expected profile, got {other:?}"),
    }
}

#[tokio::test]
async fn profile_feed_starts_blank_and_follows_admin_saves() {
    let app = common::build_test_app();
    let token = login(app.app()).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let forwarder = spawn_profile_forwarder(Arc::clone(&app.store), tx);

    let (first_seq, profile) = next_profile(&mut rx).await;
    assert_eq!(first_seq, 1);
    assert_eq!(profile["name"], "");
    assert_eq!(profile["avatar"], "");

    let response = put_json_auth(
        app.app(),
        "/api/v1/admin/profile",
        json!({ "name": "Ada", "tagline": "Engineer" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (seq, profile) = next_profile(&mut rx).await;
    assert!(seq > first_seq);
    assert_eq!(profile["name"], "Ada");
    assert_eq!(profile["tagline"], "Engineer");

    let response = put_json_auth(
        app.app(),
        "/api/v1/admin/profile",
        json!({ "github": "https://github.com/ada" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Saves merge, so earlier fields survive.
    let (_, profile) = next_profile(&mut rx).await;
    assert_eq!(profile["name"], "Ada");
    assert_eq!(profile["github"], "https://github.com/ada");

    let rest = body_json(get(app.app(), "/api/v1/profile").await).await;
    assert_eq!(rest["data"], profile);

    forwarder.abort();
}

#[tokio::test]
async fn profile_feed_ignores_content_writes() {
    let store = memory_store();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let forwarder = spawn_target_forwarder(Arc::clone(&store), LiveTarget::Profile, tx);

    next_profile(&mut rx).await;

    CollectionRepo::<Experience>::new(Arc::clone(&store))
        .create(&intern())
        .await
        .unwrap();

    let pushed = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(pushed.is_err(), "no profile push expected for a content write");

    forwarder.abort();
}
