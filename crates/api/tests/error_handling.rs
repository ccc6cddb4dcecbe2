//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use folio_api::error::AppError;
use folio_cloud::UploadError;
use folio_core::error::CoreError;
use folio_core::types::DocId;
use folio_db::StoreError;
use folio_events::EmailError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// CoreError
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Project",
        id: DocId::new("p1"),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project with id p1 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Missing required fields: name".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Missing required fields: name");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("A submit is already in flight".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("nope".into()))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn internal_core_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("connection string leaked".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_not_found_uses_entity_name() {
    let err = AppError::Store(StoreError::not_found("certificates", &DocId::new("c9")));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Certificate with id c9 not found");
}

#[tokio::test]
async fn store_not_found_outside_collections_says_document() {
    let err = AppError::Store(StoreError::not_found("settings", &DocId::new("profile")));

    let (_, json) = error_to_response(err).await;

    assert_eq!(json["error"], "Document with id profile not found");
}

#[tokio::test]
async fn invalid_document_returns_400() {
    let err = AppError::Store(StoreError::InvalidDocument("bad field".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn database_error_is_sanitized() {
    let err = AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Provider errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn email_error_returns_502() {
    let (status, json) =
        error_to_response(AppError::Email(EmailError::Build("boom".into()))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn invalid_upload_returns_400_and_rejected_upload_502() {
    let (status, _) =
        error_to_response(AppError::Upload(UploadError::InvalidFile("empty".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) =
        error_to_response(AppError::Upload(UploadError::Rejected("preset".into()))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "Image upload failed");
}

#[tokio::test]
async fn unavailable_returns_503() {
    let (status, json) =
        error_to_response(AppError::Unavailable("Image uploads are not configured".into())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid field value".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}
