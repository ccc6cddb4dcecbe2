use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use super::{Collection, ContentKind};

/// A contact-form submission as stored in the `messages` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ContactMessage {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub read: bool,
}

impl ContentKind for ContactMessage {
    const COLLECTION: Collection = Collection::Messages;
}

/// Body of a contact submission. Every field is optional on the wire so a
/// missing key and an empty value are rejected the same way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactRequest {
    /// Presence check only. Returns the unread message to store, or `None`
    /// when any field is missing or empty. Whitespace counts as present.
    pub fn into_message(self) -> Option<ContactMessage> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(ContactMessage {
            name: present(self.name)?,
            email: present(self.email)?,
            message: present(self.message)?,
            read: false,
        })
    }
}
