//! Public read endpoints for portfolio content.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use folio_core::content::ContentKind;
use folio_core::error::CoreError;
use folio_core::listing::{paginate, CategoryFilter};
use folio_db::{CollectionRepo, DocumentStore, ProfileRepo};
use serde::Deserialize;
use serde_json::Value;

use super::parse_collection;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /content/{collection}`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Category or tab to filter on; absent, empty or `All` shows everything.
    pub category: Option<String>,
    /// How many items to return after filtering; absent returns all.
    pub visible: Option<usize>,
}

async fn list_page<T: ContentKind>(
    store: Arc<dyn DocumentStore>,
    params: &ListParams,
) -> AppResult<Value> {
    let items = CollectionRepo::<T>::new(store).list().await?;
    let filter = CategoryFilter::parse(params.category.as_deref());
    let page = paginate(&items, &filter, params.visible.unwrap_or(usize::MAX));
    serde_json::to_value(page).map_err(|e| AppError::InternalError(e.to_string()))
}

/// GET /api/v1/content/{collection}
///
/// Filtered, truncated view of a public collection in its default order.
/// Returns `{ items, total, hasMore }`.
pub async fn list_content(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Value>>> {
    let collection = parse_collection(&collection)?;
    if !collection.is_public() {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Collection '{collection}' is not public"
        ))));
    }

    let page = for_kind!(collection, list_page(Arc::clone(&state.store), &params))?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/profile
///
/// The profile/hero settings. Blank fields when never saved.
pub async fn get_profile(State(state): State<AppState>) -> AppResult<impl axum::response::IntoResponse> {
    let profile = ProfileRepo::new(Arc::clone(&state.store)).get().await?;
    Ok(Json(DataResponse { data: profile }))
}
