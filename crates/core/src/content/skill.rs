use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use super::{Collection, ContentKind};

pub const DEFAULT_ICON: &str = "Code2";
pub const DEFAULT_COLOR: &str = "text-white";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SkillType {
    #[default]
    Skill,
    Tool,
}

impl SkillType {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillType::Skill => "skill",
            SkillType::Tool => "tool",
        }
    }
}

/// An entry in the skills/tools orbit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Skill {
    #[serde(rename = "type", default)]
    pub skill_type: SkillType,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon_name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Default for Skill {
    fn default() -> Self {
        Self {
            skill_type: SkillType::Skill,
            name: String::new(),
            icon_name: default_icon(),
            color: default_color(),
            description: String::new(),
        }
    }
}

impl ContentKind for Skill {
    const COLLECTION: Collection = Collection::Skills;

    fn category(&self) -> Option<&str> {
        Some(self.skill_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_skill_form() {
        let s = Skill::default();
        assert_eq!(s.skill_type, SkillType::Skill);
        assert_eq!(s.icon_name, "Code2");
        assert_eq!(s.color, "text-white");
    }

    #[test]
    fn sparse_document_fills_defaults() {
        let s: Skill = serde_json::from_value(serde_json::json!({
            "type": "tool",
            "name": "Figma"
        }))
        .unwrap();
        assert_eq!(s.category(), Some("tool"));
        assert_eq!(s.icon_name, "Code2");
    }
}
