//! Admin CRUD over every content collection.
//!
//! Writes are single-shot and last-write-wins. Every successful write is
//! published on the store's change feed, so open live views refresh on
//! their own.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::content::{Collection, ContentKind};
use folio_core::error::CoreError;
use folio_core::tags::split_tags;
use folio_core::types::DocId;
use folio_db::store::{strip_reserved, to_document};
use folio_db::{CollectionRepo, DocumentStore};
use serde::Deserialize;
use serde_json::Value;

use super::parse_collection;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Body decoding
// ---------------------------------------------------------------------------

/// Decode an admin form body into `T`.
///
/// Store-owned keys (`id`, `createdAt`) are dropped and missing keys take
/// the kind's blank defaults, so an absent field and an empty one fail
/// presence validation the same way. Project tags may be sent either as a
/// list or as the comma-separated text of the edit form. Validation runs
/// before any store call.
pub(crate) fn decode_form<T: ContentKind>(body: Value) -> AppResult<T> {
    let Value::Object(mut body) = body else {
        return Err(AppError::BadRequest("Request body must be a JSON object".into()));
    };
    strip_reserved(&mut body);

    let mut fields = to_document(&T::default())?;
    fields.extend(body);

    if T::COLLECTION == Collection::Projects {
        if let Some(Value::String(text)) = fields.get("tags") {
            let tags = split_tags(text).into_iter().map(Value::String).collect();
            fields.insert("tags".into(), Value::Array(tags));
        }
    }

    let form: T = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::BadRequest(format!("Invalid {}: {e}", T::COLLECTION.entity())))?;
    form.validate().map_err(CoreError::from)?;
    Ok(form)
}

fn to_value<S: serde::Serialize>(value: &S) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::InternalError(e.to_string()))
}

async fn list_items<T: ContentKind>(store: Arc<dyn DocumentStore>) -> AppResult<Value> {
    to_value(&CollectionRepo::<T>::new(store).list().await?)
}

async fn get_item<T: ContentKind>(store: Arc<dyn DocumentStore>, id: &DocId) -> AppResult<Value> {
    to_value(&CollectionRepo::<T>::new(store).get(id).await?)
}

async fn create_item<T: ContentKind>(store: Arc<dyn DocumentStore>, body: Value) -> AppResult<Value> {
    let form = decode_form::<T>(body)?;
    to_value(&CollectionRepo::<T>::new(store).create(&form).await?)
}

async fn update_item<T: ContentKind>(
    store: Arc<dyn DocumentStore>,
    id: &DocId,
    body: Value,
) -> AppResult<Value> {
    let form = decode_form::<T>(body)?;
    to_value(&CollectionRepo::<T>::new(store).update(id, &form).await?)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Query parameters for `DELETE /admin/{collection}/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

/// GET /api/v1/admin/{collection}
pub async fn list(
    _admin: AuthUser,
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;
    let items = for_kind!(collection, list_items(Arc::clone(&state.store)))?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/admin/{collection}/{id}
pub async fn get(
    _admin: AuthUser,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;
    let id = DocId::new(id);
    let item = for_kind!(collection, get_item(Arc::clone(&state.store), &id))?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/admin/{collection}
///
/// Create an item. The store assigns `id` and `createdAt`.
pub async fn create(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;
    let item = for_kind!(collection, create_item(Arc::clone(&state.store), body))?;

    tracing::info!(
        collection = %collection,
        id = %item["id"],
        admin = %admin.email,
        "Admin created item",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/admin/{collection}/{id}
///
/// Overwrite every editable field of an item. `id` and `createdAt` never
/// change.
pub async fn update(
    admin: AuthUser,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;
    let id = DocId::new(id);
    let item = for_kind!(collection, update_item(Arc::clone(&state.store), &id, body))?;

    tracing::info!(collection = %collection, id = %id, admin = %admin.email, "Admin updated item");

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/admin/{collection}/{id}?confirm=true
///
/// Irreversible. Without `confirm=true` nothing is deleted.
pub async fn delete(
    admin: AuthUser,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Query(params): Query<DeleteParams>,
) -> AppResult<StatusCode> {
    let collection = parse_collection(&collection)?;
    if !params.confirm {
        return Err(AppError::BadRequest(
            "Deletion must be confirmed with ?confirm=true".into(),
        ));
    }

    let id = DocId::new(id);
    state.store.delete(collection.name(), &id).await?;

    tracing::info!(collection = %collection, id = %id, admin = %admin.email, "Admin deleted item");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use folio_core::content::{Experience, Project};
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_form_strips_reserved_keys() {
        let project: Project = decode_form(json!({
            "id": "spoofed",
            "createdAt": "2020-01-01T00:00:00Z",
            "title": "Folio",
            "description": "Site",
        }))
        .unwrap();
        assert_eq!(project.title, "Folio");
    }

    #[test]
    fn decode_form_splits_comma_separated_tags() {
        let project: Project = decode_form(json!({
            "title": "Folio",
            "description": "Site",
            "tags": "rust, axum, ,sqlx",
        }))
        .unwrap();
        assert_eq!(project.tags, vec!["rust", "axum", "sqlx"]);
    }

    #[test]
    fn decode_form_reports_missing_fields() {
        let err = decode_form::<Experience>(json!({ "role": "Intern", "description": "" }))
            .unwrap_err();
        assert_matches!(
            err,
            AppError::Core(CoreError::Validation(msg))
                if msg == "Missing required fields: description, organization, start_date"
        );
    }

    #[test]
    fn decode_form_rejects_non_objects() {
        assert_matches!(decode_form::<Project>(json!([1, 2])), Err(AppError::BadRequest(_)));
    }
}
