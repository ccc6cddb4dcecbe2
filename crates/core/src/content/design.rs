use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use super::{Collection, ContentKind};

/// Gallery categories offered by the upload form.
pub const DESIGN_CATEGORIES: [&str; 5] = [
    "Event Flyers",
    "Social Media Designs",
    "Educational Flyers",
    "Creative Posters",
    "Branding Designs",
];

/// One image in the design gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DesignAsset {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub image_url: String,
}

impl DesignAsset {
    /// Build an asset from an uploaded file; the title is the file name
    /// without its extension.
    pub fn from_upload(file_name: &str, category: &str, image_url: String) -> Self {
        let title = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name)
            .to_string();
        Self {
            title,
            category: category.to_string(),
            image_url,
        }
    }
}

pub fn is_known_category(category: &str) -> bool {
    DESIGN_CATEGORIES.contains(&category)
}

impl ContentKind for DesignAsset {
    const COLLECTION: Collection = Collection::Designs;

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
}
