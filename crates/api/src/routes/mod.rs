pub mod admin;
pub mod auth;
pub mod contact;
pub mod content;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                   WebSocket live subscriptions
///
/// /auth/login                           login (public)
/// /auth/logout                          logout (requires auth)
/// /auth/session                         current session (requires auth)
///
/// /content/{collection}                 public list (?category=&visible=)
/// /profile                              public profile settings
/// /messages                             submit contact message (public)
///
/// /admin/profile                        get, merge-update
/// /admin/uploads                        single image upload (?folder=)
/// /admin/uploads/designs                bulk design gallery upload
/// /admin/{collection}                   list, create
/// /admin/{collection}/{id}              get, update, delete (?confirm=true)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Auth routes (login is public; logout and session need a token).
        .nest("/auth", auth::router())
        // Public content.
        .merge(content::router())
        // Contact submissions.
        .merge(contact::router())
        // Admin routes (every handler requires a token).
        .nest("/admin", admin::router())
}
