use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Collection holding singleton settings documents.
pub const PROFILE_COLLECTION: &str = "settings";
/// Well-known key of the profile singleton.
pub const PROFILE_KEY: &str = "profile";

/// Site owner profile shown in the hero and footer. Every field is optional;
/// saves merge into the stored document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProfileSettings {
    pub name: String,
    pub tagline: String,
    pub bio: String,
    pub resume_link: String,
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
    pub avatar: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_decodes_with_blanks() {
        let p: ProfileSettings =
            serde_json::from_value(serde_json::json!({"name": "Ada", "resumeLink": "r.pdf"}))
                .unwrap();
        assert_eq!(p.name, "Ada");
        assert_eq!(p.resume_link, "r.pdf");
        assert!(p.avatar.is_empty());
    }
}
