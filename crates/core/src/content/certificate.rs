use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use super::{Collection, ContentKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Certificate {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub issuer: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image_url: String,
}

impl ContentKind for Certificate {
    const COLLECTION: Collection = Collection::Certificates;
}
