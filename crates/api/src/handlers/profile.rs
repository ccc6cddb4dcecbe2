//! Admin endpoints for the `settings/profile` singleton.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use folio_db::ProfileRepo;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/profile
pub async fn get_profile(
    _admin: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::new(Arc::clone(&state.store)).get().await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/admin/profile
///
/// Merge-write: only the profile fields present in the body change.
pub async fn update_profile(
    admin: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let Value::Object(patch) = body else {
        return Err(AppError::BadRequest("Request body must be a JSON object".into()));
    };

    let profile = ProfileRepo::new(Arc::clone(&state.store)).merge(patch).await?;

    tracing::info!(admin = %admin.email, "Profile settings updated");

    Ok(Json(DataResponse { data: profile }))
}
