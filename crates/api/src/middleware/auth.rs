//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated admin, extracted from a Bearer token in the
/// `Authorization` header.
///
/// ```ignore
/// async fn my_handler(admin: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(email = %admin.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The admin email (from `claims.sub`).
    pub email: String,
    /// Token id, needed to revoke the token on logout.
    pub jti: String,
    /// Token expiry (Unix seconds).
    pub exp: i64,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        if state.revoked_tokens.is_revoked(&claims.jti).await {
            return Err(unauthorized("Session has been signed out"));
        }

        Ok(AuthUser {
            email: claims.sub,
            jti: claims.jti,
            exp: claims.exp,
        })
    }
}
