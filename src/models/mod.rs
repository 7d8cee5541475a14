use serde::{Deserialize, Serialize};

mod item;

pub use item::{Item, ItemKind, UNKNOWN_YEAR};

/// A single recommended title returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

impl From<&Item> for Recommendation {
    fn from(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
        }
    }
}

/// Full catalog entry for a title lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleDetails {
    pub title: String,
    pub description: String,
    pub kind: ItemKind,
    pub categories: Vec<String>,
    pub release_year: Option<i32>,
}

impl From<&Item> for TitleDetails {
    fn from(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            kind: item.kind,
            categories: item.category_tags().map(str::to_string).collect(),
            release_year: (item.release_year != UNKNOWN_YEAR).then_some(item.release_year),
        }
    }
}

/// Poster image location for a title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Poster {
    pub title: String,
    pub url: String,
    /// False when the URL is the generated placeholder
    pub found: bool,
}
