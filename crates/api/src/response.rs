//! Shared response envelope types for API handlers.
//!
//! API responses use a `{ "data": ... }` envelope. The contact proxy at
//! `/api/send-email` is the one exception; it keeps the flat shape the site's
//! contact form expects.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
