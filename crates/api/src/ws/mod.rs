//! WebSocket live subscriptions.
//!
//! Clients send `subscribe` / `unsubscribe` messages naming a public
//! collection (or `profile`) and receive a full ordered `snapshot` (or the
//! current `profile`) whenever it changes.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{
    spawn_profile_forwarder, spawn_snapshot_forwarder, spawn_target_forwarder, ws_handler,
};
pub use heartbeat::start_heartbeat;
pub use manager::{WsManager, WsSender};
