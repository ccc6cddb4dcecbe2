use axum::routing::get;
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Public read routes.
///
/// ```text
/// GET /content/{collection}  -> list_content
/// GET /profile               -> get_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/content/{collection}", get(content::list_content))
        .route("/profile", get(content::get_profile))
}
