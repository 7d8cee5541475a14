use std::{collections::HashMap, fs::File, io::Read, path::Path};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Item, ItemKind, UNKNOWN_YEAR},
};

const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%Y-%m-%d"];

/// One row of the source dataset; columns outside this set are ignored
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    listed_in: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    date_added: Option<String>,
}

/// Cleaned, immutable catalog snapshot with its lower-cased title index
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    titles: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from already-cleaned items, in order
    ///
    /// Duplicate titles (compared case-insensitively) resolve to the last row
    /// seen; every collision is logged.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut titles = HashMap::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            let key = normalize_title(&item.title);
            if key.is_empty() {
                continue;
            }
            if let Some(previous) = titles.insert(key, position) {
                tracing::warn!(
                    title = %item.title,
                    shadowed_row = previous,
                    row = position,
                    "Duplicate title in catalog, keeping the later row"
                );
            }
        }

        Self { items, titles }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    /// Row position for a title, matched case-insensitively
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.titles.get(&normalize_title(title)).copied()
    }

    pub fn find(&self, title: &str) -> Option<&Item> {
        self.position_of(title).and_then(|position| self.get(position))
    }

    /// Distinct category tags, sorted
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .items
            .iter()
            .flat_map(Item::category_tags)
            .map(str::to_string)
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }

    /// Distinct release years, sorted ascending (includes the unknown sentinel)
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.items.iter().map(|item| item.release_year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// Lower-cased lookup key for a title
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

/// Loads and cleans the catalog from a CSV file on disk
pub fn load_path(path: impl AsRef<Path>) -> AppResult<Catalog> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        AppError::Configuration(format!(
            "Unable to open catalog {}: {}",
            path.display(),
            e
        ))
    })?;
    let catalog = load(file)?;

    tracing::info!(
        path = %path.display(),
        items = catalog.len(),
        titles = catalog.titles.len(),
        "Catalog loaded"
    );

    Ok(catalog)
}

/// Loads and cleans the catalog from any CSV source with a header row
///
/// Rows without a description are dropped. Missing categories become empty
/// and unparsable dates become `UNKNOWN_YEAR`. Row order is preserved.
pub fn load<R: Read>(source: R) -> AppResult<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let mut items = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize::<CatalogRow>() {
        let row = row?;
        match clean_row(row) {
            Some(item) => items.push(item),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "Dropped catalog rows without a description");
    }

    Ok(Catalog::from_items(items))
}

fn clean_row(row: CatalogRow) -> Option<Item> {
    let description = row.description.filter(|d| !d.trim().is_empty())?;

    Some(Item::new(
        row.title.unwrap_or_default(),
        description,
        row.listed_in.unwrap_or_default(),
        row.kind.as_deref().map(ItemKind::parse).unwrap_or(ItemKind::Other),
        row.date_added.as_deref().map(parse_year).unwrap_or(UNKNOWN_YEAR),
    ))
}

/// Extracts the year from a `date_added` value, `UNKNOWN_YEAR` on failure
pub fn parse_year(raw: &str) -> i32 {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(|date| date.year())
        .unwrap_or(UNKNOWN_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
show_id,type,title,director,date_added,listed_in,description
s1,TV Show,Stranger Things,,\"July 15, 2016\",\"TV Dramas, TV Sci-Fi & Fantasy\",A boy vanishes and his town uncovers secret experiments.
s2,TV Show,Dark,,\" December 1, 2017\",\"TV Dramas, TV Sci-Fi & Fantasy\",A missing child sets four families on a frantic hunt.
s3,TV Show,Friends,,,Comedy,Six friends navigate life and love in Manhattan.
s4,Movie,No Description,,\"May 1, 2020\",Dramas,
s5,Movie,Uncategorized,,not a date,,A film nobody tagged.
";

    #[test]
    fn test_load_drops_rows_without_description() {
        let catalog = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.find("No Description").is_none());
    }

    #[test]
    fn test_load_preserves_row_order() {
        let catalog = load(SAMPLE.as_bytes()).unwrap();
        let titles: Vec<&str> = catalog.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Stranger Things", "Dark", "Friends", "Uncategorized"]
        );
    }

    #[test]
    fn test_load_parses_years_with_fallback() {
        let catalog = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.find("Stranger Things").unwrap().release_year, 2016);
        assert_eq!(catalog.find("Dark").unwrap().release_year, 2017);
        assert_eq!(catalog.find("Friends").unwrap().release_year, UNKNOWN_YEAR);
        assert_eq!(
            catalog.find("Uncategorized").unwrap().release_year,
            UNKNOWN_YEAR
        );
    }

    #[test]
    fn test_load_defaults_missing_categories() {
        let catalog = load(SAMPLE.as_bytes()).unwrap();
        let item = catalog.find("Uncategorized").unwrap();
        assert_eq!(item.categories, "");
        assert_eq!(item.content, "A film nobody tagged. ");
        assert_eq!(item.kind, ItemKind::Movie);
    }

    #[test]
    fn test_title_lookup_is_case_insensitive() {
        let catalog = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.position_of("stranger things"), Some(0));
        assert_eq!(catalog.position_of("STRANGER THINGS"), Some(0));
        assert_eq!(catalog.position_of("Narcos"), None);
    }

    #[test]
    fn test_duplicate_titles_keep_last_row() {
        let items = vec![
            Item::new("Dup".into(), "first".into(), String::new(), ItemKind::Movie, 2001),
            Item::new("dup".into(), "second".into(), String::new(), ItemKind::Movie, 2002),
        ];
        let catalog = Catalog::from_items(items);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position_of("DUP"), Some(1));
        assert_eq!(catalog.find("dup").unwrap().description, "second");
    }

    #[test]
    fn test_titles_differing_in_whitespace_stay_distinct() {
        let items = vec![
            Item::new("Dup ".into(), "padded".into(), String::new(), ItemKind::Movie, 2001),
            Item::new("dup".into(), "plain".into(), String::new(), ItemKind::Movie, 2002),
        ];
        let catalog = Catalog::from_items(items);
        assert_eq!(catalog.position_of("Dup "), Some(0));
        assert_eq!(catalog.position_of("DUP"), Some(1));
    }

    #[test]
    fn test_genres_and_years_are_sorted_and_distinct() {
        let catalog = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            catalog.genres(),
            vec!["Comedy", "TV Dramas", "TV Sci-Fi & Fantasy"]
        );
        assert_eq!(catalog.years(), vec![0, 2016, 2017]);
    }

    #[test]
    fn test_parse_year_formats() {
        assert_eq!(parse_year("September 25, 2021"), 2021);
        assert_eq!(parse_year("  August 4, 2017 "), 2017);
        assert_eq!(parse_year("Sep 5, 2019"), 2019);
        assert_eq!(parse_year("2018-03-01"), 2018);
        assert_eq!(parse_year(""), UNKNOWN_YEAR);
        assert_eq!(parse_year("yesterday"), UNKNOWN_YEAR);
    }

    #[test]
    fn test_empty_source_yields_empty_catalog() {
        let catalog = load("title,description,listed_in,type,date_added\n".as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }
}
