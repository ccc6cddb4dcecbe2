//! Handlers for the `/auth` resource (login, logout, session).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionInfo,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub email: String,
    /// Token expiry (Unix seconds).
    pub expires_at: i64,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Check the admin email (case-insensitive) and password, then issue an
/// access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let admin = &state.config.admin;

    if !input.email.trim().eq_ignore_ascii_case(&admin.email) {
        return Err(invalid_credentials());
    }

    let password_valid = verify_password(&input.password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!("Failed admin login attempt");
        return Err(invalid_credentials());
    }

    let (access_token, claims) = generate_access_token(&admin.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(email = %admin.email, "Admin signed in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: SessionInfo {
            email: claims.sub,
            expires_at: claims.exp,
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented token. Returns 204.
pub async fn logout(admin: AuthUser, State(state): State<AppState>) -> StatusCode {
    state.revoked_tokens.revoke(&admin.jti, admin.exp).await;
    tracing::info!(email = %admin.email, "Admin signed out");
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/session
///
/// The current session, or 401 when signed out.
pub async fn session(admin: AuthUser) -> Json<DataResponse<SessionInfo>> {
    Json(DataResponse {
        data: SessionInfo {
            email: admin.email,
            expires_at: admin.exp,
        },
    })
}
