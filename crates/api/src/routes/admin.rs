//! Route definitions for `/admin`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, profile, uploads};
use crate::state::AppState;

/// Routes mounted at `/admin`. Static segments win over `{collection}`.
///
/// ```text
/// GET    /profile                -> get_profile
/// PUT    /profile                -> update_profile
/// POST   /uploads?folder=        -> upload_image
/// POST   /uploads/designs        -> upload_designs
/// GET    /{collection}           -> list
/// POST   /{collection}           -> create
/// GET    /{collection}/{id}      -> get
/// PUT    /{collection}/{id}      -> update
/// DELETE /{collection}/{id}      -> delete (?confirm=true)
/// ```
pub fn router() -> Router<AppState> {
    let uploads = Router::new()
        .route("/uploads", post(uploads::upload_image))
        .route("/uploads/designs", post(uploads::upload_designs))
        .layer(DefaultBodyLimit::max(uploads::MAX_UPLOAD_BYTES));

    Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .merge(uploads)
        .route("/{collection}", get(admin::list).post(admin::create))
        .route(
            "/{collection}/{id}",
            get(admin::get).put(admin::update).delete(admin::delete),
        )
}
