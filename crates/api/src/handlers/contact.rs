//! Contact form endpoints.
//!
//! `POST /api/send-email` is the notification proxy the public contact form
//! calls. Its response shape is flat (`{ success, id }` / `{ error }`), not
//! the `{ data }` envelope, and every failure maps to a fixed message.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::content::{ContactMessage, ContactRequest};
use folio_core::error::CoreError;
use folio_db::CollectionRepo;
use serde::Serialize;
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

const MISSING_FIELDS: &str = "All fields are required.";
const SEND_FAILED: &str = "Failed to send email.";

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// POST /api/send-email
///
/// Forward `{name, email, message}` to the site owner.
///
/// - 400 `{error: "All fields are required."}` when a field is missing or
///   empty, or the body is not JSON.
/// - 400 `{error: <provider message>}` when the provider rejects the email.
/// - 500 `{error: "Failed to send email."}` for anything else.
/// - 200 `{success: true, id}` on success.
pub async fn send_email(
    State(state): State<AppState>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Some(message) = body.ok().and_then(|Json(req)| req.into_message()) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    };

    let Some(notifier) = state.notifier.as_ref() else {
        tracing::error!("Contact email requested but no email provider is configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED);
    };

    match notifier.notify(&message).await {
        Ok(id) => {
            tracing::info!(id = %id, provider = notifier.provider_name(), "Contact email sent");
            (StatusCode::OK, Json(json!({ "success": true, "id": id }))).into_response()
        }
        Err(e) if e.is_rejection() => {
            tracing::warn!(error = %e, "Email provider rejected contact email");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to send contact email");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED)
        }
    }
}

/// Response for `POST /api/v1/messages`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedMessage {
    pub id: String,
    /// Whether the owner notification went out. Delivery is best-effort.
    pub notified: bool,
}

/// POST /api/v1/messages
///
/// Store a contact submission in `messages` (unread) and notify the owner.
/// The stored message is kept even if the notification fails.
pub async fn submit_message(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> AppResult<impl IntoResponse> {
    let message = req
        .into_message()
        .ok_or_else(|| CoreError::Validation(MISSING_FIELDS.into()))?;

    let stored = CollectionRepo::<ContactMessage>::new(Arc::clone(&state.store))
        .create(&message)
        .await?;

    let notified = match state.notifier.as_ref() {
        Some(notifier) => match notifier.notify(&message).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(id = %stored.id, error = %e, "Contact notification failed");
                false
            }
        },
        None => false,
    };

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmittedMessage {
                id: stored.id.to_string(),
                notified,
            },
        }),
    ))
}
