//! HTTP handlers, grouped by resource.

/// Run a generic async handler body for the content kind behind a
/// [`Collection`](folio_core::content::Collection).
///
/// `$f` must be generic over `T: ContentKind` (or a narrower bound every
/// kind satisfies) and return the same type for every kind.
macro_rules! for_kind {
    ($collection:expr, $f:ident ( $($arg:expr),* $(,)? )) => {{
        use folio_core::content::{
            Certificate, Collection, ContactMessage, DesignAsset, Experience, Project, Skill,
        };
        match $collection {
            Collection::Experience => $f::<Experience>($($arg),*).await,
            Collection::Projects => $f::<Project>($($arg),*).await,
            Collection::Skills => $f::<Skill>($($arg),*).await,
            Collection::Certificates => $f::<Certificate>($($arg),*).await,
            Collection::Designs => $f::<DesignAsset>($($arg),*).await,
            Collection::Messages => $f::<ContactMessage>($($arg),*).await,
        }
    }};
}

pub mod admin;
pub mod auth;
pub mod contact;
pub mod content;
pub mod profile;
pub mod uploads;

use folio_core::content::Collection;

use crate::error::AppError;

/// Parse a `{collection}` path segment.
pub(crate) fn parse_collection(name: &str) -> Result<Collection, AppError> {
    name.parse::<Collection>().map_err(AppError::BadRequest)
}
