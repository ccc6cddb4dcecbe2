use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use super::{Collection, ContentKind};
use crate::editor::Editable;
use crate::tags::{join_tags, split_tags};

/// A portfolio project card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Project {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub live: String,
}

impl ContentKind for Project {
    const COLLECTION: Collection = Collection::Projects;
}

/// Admin form buffer for a project. Tags are edited as one comma-separated
/// string and split on submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub live: String,
}

impl Editable for Project {
    type Form = ProjectForm;

    fn to_form(&self) -> ProjectForm {
        ProjectForm {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            tags: join_tags(&self.tags),
            github: self.github.clone(),
            live: self.live.clone(),
        }
    }

    fn from_form(form: &ProjectForm) -> Self {
        Project {
            title: form.title.clone(),
            description: form.description.clone(),
            image: form.image.clone(),
            tags: split_tags(&form.tags),
            github: form.github.clone(),
            live: form.live.clone(),
        }
    }
}
