use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use super::{Collection, ContentKind};

/// Which timeline tab an experience entry belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ExperienceType {
    #[default]
    Work,
    /// Older admin forms wrote `volunteer`; both spellings decode here.
    #[serde(alias = "volunteer")]
    Volunteering,
}

impl ExperienceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceType::Work => "work",
            ExperienceType::Volunteering => "volunteering",
        }
    }
}

/// A work or volunteering timeline entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Experience {
    #[serde(rename = "type", default)]
    pub experience_type: ExperienceType,
    #[validate(length(min = 1))]
    pub role: String,
    #[validate(length(min = 1))]
    pub organization: String,
    #[validate(length(min = 1))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub is_current: bool,
    #[validate(length(min = 1))]
    pub description: String,
}

impl Experience {
    /// `"{role} — {organization}"`
    pub fn headline(&self) -> String {
        format!("{} — {}", self.role, self.organization)
    }

    /// Start and end joined by `" - "`; a current position ends in `Present`.
    pub fn date_range(&self) -> String {
        let end = if self.is_current {
            "Present"
        } else {
            self.end_date.as_str()
        };
        format!("{} - {}", self.start_date, end)
    }
}

impl ContentKind for Experience {
    const COLLECTION: Collection = Collection::Experience;

    fn category(&self) -> Option<&str> {
        Some(self.experience_type.as_str())
    }
}
