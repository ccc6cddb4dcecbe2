use axum::routing::post;
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Contact submission under `/api/v1`.
///
/// ```text
/// POST /messages  -> submit_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/messages", post(contact::submit_message))
}

/// The notification proxy, mounted at the root (`/api/send-email`) where the
/// site's contact form posts.
pub fn proxy_router() -> Router<AppState> {
    Router::new().route("/api/send-email", post(contact::send_email))
}
