use std::fmt;

use serde::{Deserialize, Serialize};

/// All timestamps are UTC and assigned by the document store.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque, store-assigned document key.
///
/// Immutable once assigned. Singleton documents use a fixed well-known key
/// (see [`crate::content::profile::PROFILE_KEY`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
