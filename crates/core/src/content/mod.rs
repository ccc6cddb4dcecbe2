//! Portfolio content kinds and the metadata the store needs to query them.
//!
//! Every collection-backed kind implements [`ContentKind`], which pins its
//! collection, its list ordering and (optionally) the field used by the
//! category/tab filters. Persisted items are wrapped in [`ContentItem`],
//! which adds the store-owned `id` and `createdAt`.

pub mod certificate;
pub mod design;
pub mod experience;
pub mod message;
pub mod profile;
pub mod project;
pub mod skill;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{DocId, Timestamp};

pub use certificate::Certificate;
pub use design::DesignAsset;
pub use experience::{Experience, ExperienceType};
pub use message::{ContactMessage, ContactRequest};
pub use profile::ProfileSettings;
pub use project::{Project, ProjectForm};
pub use skill::{Skill, SkillType};

/// Reserved document keys owned by the store. Never accepted from callers.
pub const RESERVED_KEYS: &[&str] = &["id", "createdAt"];

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort direction for a collection query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// The key a query sorts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    /// The server-assigned creation timestamp.
    CreatedAt,
    /// A top-level document field, compared by its JSON value.
    Field(String),
}

/// Ordering of a collection query. Equal keys have unspecified relative order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub order_by: OrderBy,
    pub direction: Direction,
}

impl Ordering {
    pub fn created_at(direction: Direction) -> Self {
        Self {
            order_by: OrderBy::CreatedAt,
            direction,
        }
    }

    pub fn field(name: &str, direction: Direction) -> Self {
        Self {
            order_by: OrderBy::Field(name.to_string()),
            direction,
        }
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// The six flat document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Experience,
    Projects,
    Skills,
    Certificates,
    Designs,
    Messages,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Experience,
        Collection::Projects,
        Collection::Skills,
        Collection::Certificates,
        Collection::Designs,
        Collection::Messages,
    ];

    /// Store-level collection name.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Experience => "experience",
            Collection::Projects => "projects",
            Collection::Skills => "skills",
            Collection::Certificates => "certificates",
            Collection::Designs => "designs",
            Collection::Messages => "messages",
        }
    }

    /// Singular entity name used in error messages and logs.
    pub fn entity(self) -> &'static str {
        match self {
            Collection::Experience => "Experience",
            Collection::Projects => "Project",
            Collection::Skills => "Skill",
            Collection::Certificates => "Certificate",
            Collection::Designs => "Design",
            Collection::Messages => "Message",
        }
    }

    /// Default list ordering for the collection.
    pub fn ordering(self) -> Ordering {
        match self {
            Collection::Experience => Ordering::field("startDate", Direction::Desc),
            Collection::Certificates => Ordering::field("date", Direction::Desc),
            Collection::Skills => Ordering::created_at(Direction::Asc),
            Collection::Projects | Collection::Designs | Collection::Messages => {
                Ordering::created_at(Direction::Desc)
            }
        }
    }

    /// Field the public category/tab filter compares against, if any.
    pub fn category_field(self) -> Option<&'static str> {
        match self {
            Collection::Experience | Collection::Skills => Some("type"),
            Collection::Designs => Some("category"),
            _ => None,
        }
    }

    /// Whether anonymous visitors may read the collection.
    pub fn is_public(self) -> bool {
        !matches!(self, Collection::Messages)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Collection::ALL.iter().map(|c| c.name()).collect();
                format!(
                    "Unknown collection '{s}'. Must be one of: {}",
                    names.join(", ")
                )
            })
    }
}

// ---------------------------------------------------------------------------
// ContentKind / ContentItem
// ---------------------------------------------------------------------------

/// A collection-backed content type.
///
/// The struct itself holds only the editable fields; `id` and `createdAt`
/// live on [`ContentItem`].
pub trait ContentKind:
    Serialize + DeserializeOwned + Validate + Clone + Default + Send + Sync + 'static
{
    const COLLECTION: Collection;

    /// Value of the category/tab field, if the kind has one.
    fn category(&self) -> Option<&str> {
        None
    }
}

/// A persisted content record: store-owned metadata plus the typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem<T> {
    pub id: DocId,
    pub created_at: Option<Timestamp>,
    #[serde(flatten)]
    pub fields: T,
}

/// Anything a category/tab filter can inspect.
pub trait Categorized {
    fn category(&self) -> Option<&str>;
}

impl<T: ContentKind> Categorized for ContentItem<T> {
    fn category(&self) -> Option<&str> {
        self.fields.category()
    }
}

impl<V: Categorized> Categorized for &V {
    fn category(&self) -> Option<&str> {
        (**self).category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip_through_from_str() {
        for c in Collection::ALL {
            assert_eq!(c.name().parse::<Collection>().unwrap(), c);
        }
    }

    #[test]
    fn unknown_collection_lists_valid_names() {
        let err = "settings".parse::<Collection>().unwrap_err();
        assert!(err.contains("experience"));
        assert!(err.contains("messages"));
    }

    #[test]
    fn orderings_follow_entity_conventions() {
        assert_eq!(
            Collection::Experience.ordering(),
            Ordering::field("startDate", Direction::Desc)
        );
        assert_eq!(
            Collection::Certificates.ordering(),
            Ordering::field("date", Direction::Desc)
        );
        assert_eq!(
            Collection::Skills.ordering(),
            Ordering::created_at(Direction::Asc)
        );
        assert_eq!(
            Collection::Designs.ordering(),
            Ordering::created_at(Direction::Desc)
        );
    }

    #[test]
    fn messages_are_not_public() {
        assert!(!Collection::Messages.is_public());
        assert!(Collection::Designs.is_public());
    }

    #[test]
    fn content_item_flattens_fields() {
        let item = ContentItem {
            id: DocId::new("d1"),
            created_at: None,
            fields: DesignAsset {
                title: "Poster".into(),
                category: "Creative Posters".into(),
                image_url: "https://img/1.png".into(),
            },
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "d1");
        assert_eq!(json["title"], "Poster");
        assert_eq!(json["imageUrl"], "https://img/1.png");
        assert!(json["createdAt"].is_null());
    }
}
