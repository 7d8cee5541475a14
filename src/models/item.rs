use serde::{Deserialize, Serialize};

/// Release year sentinel for items whose date could not be parsed
pub const UNKNOWN_YEAR: i32 = 0;

/// Kind of catalog entry, taken from the dataset's `type` column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Movie,
    TvShow,
    Other,
}

impl ItemKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "movie" => ItemKind::Movie,
            "tv show" | "tv_show" | "series" => ItemKind::TvShow,
            _ => ItemKind::Other,
        }
    }
}

/// A cleaned catalog record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub title: String,
    pub description: String,
    /// Raw comma-delimited category string, e.g. "TV Dramas, TV Sci-Fi & Fantasy"
    pub categories: String,
    pub kind: ItemKind,
    /// Year the item was added to the catalog, `UNKNOWN_YEAR` when unparsable
    pub release_year: i32,
    /// Description followed by categories; the text that gets vectorized
    pub content: String,
}

impl Item {
    pub fn new(
        title: String,
        description: String,
        categories: String,
        kind: ItemKind,
        release_year: i32,
    ) -> Self {
        let content = format!("{} {}", description, categories);
        Self {
            title,
            description,
            categories,
            kind,
            release_year,
            content,
        }
    }

    /// Individual category tags, split the way the dataset delimits them
    pub fn category_tags(&self) -> impl Iterator<Item = &str> {
        self.categories
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    /// Loose category match: case-insensitive substring of the raw category string
    pub fn matches_category(&self, filter: &str) -> bool {
        self.categories
            .to_lowercase()
            .contains(&filter.to_lowercase())
    }
}
