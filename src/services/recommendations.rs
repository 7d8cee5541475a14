use crate::{
    error::AppResult,
    models::{Item, Recommendation, UNKNOWN_YEAR},
    services::{catalog::Catalog, similarity::SimilarityIndex, vectorizer},
};

/// Maximum number of titles returned per recommendation query
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Optional narrowing applied after similarity ranking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationFilters {
    /// Case-insensitive substring of the item's raw category string
    pub category: Option<String>,
    /// Exact release year
    pub year: Option<i32>,
}

impl RecommendationFilters {
    pub fn new(category: Option<String>, year: Option<i32>) -> Self {
        Self {
            category: category.filter(|c| !c.trim().is_empty()),
            year: year.filter(|y| *y != UNKNOWN_YEAR),
        }
    }

    fn matches(&self, item: &Item) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| item.matches_category(category));
        let year_ok = self.year.map_or(true, |year| item.release_year == year);
        category_ok && year_ok
    }
}

/// Immutable catalog snapshot plus its similarity matrix
///
/// Built once and shared read-only between requests.
#[derive(Debug)]
pub struct RecommendationIndex {
    catalog: Catalog,
    similarity: SimilarityIndex,
    vocabulary_size: usize,
}

impl RecommendationIndex {
    /// Vectorizes the catalog and precomputes all pairwise similarities
    pub fn build(catalog: Catalog) -> AppResult<Self> {
        let (vocabulary, vectors) = vectorizer::build_vocabulary_and_vectors(catalog.items())?;
        let similarity = SimilarityIndex::build(&vectors);

        tracing::info!(
            items = catalog.len(),
            vocabulary = vocabulary.len(),
            "Recommendation index built"
        );

        Ok(Self {
            catalog,
            similarity,
            vocabulary_size: vocabulary.len(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityIndex {
        &self.similarity
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Up to `MAX_RECOMMENDATIONS` items most similar to `seed_title`
    ///
    /// An unknown seed and filters that remove every candidate both yield an
    /// empty list.
    pub fn recommend(
        &self,
        seed_title: &str,
        filters: &RecommendationFilters,
    ) -> Vec<Recommendation> {
        self.ranked(seed_title, filters)
            .into_iter()
            .map(|(item, _)| Recommendation::from(item))
            .collect()
    }

    /// Same as `recommend`, keeping each item's similarity score
    pub fn ranked(&self, seed_title: &str, filters: &RecommendationFilters) -> Vec<(&Item, f64)> {
        let Some(seed) = self.catalog.position_of(seed_title) else {
            tracing::debug!(seed = %seed_title, "Seed title not in catalog");
            return Vec::new();
        };

        self.similarity
            .neighbors(seed)
            .into_iter()
            .filter_map(|(position, score)| {
                self.catalog.get(position).map(|item| (item, score))
            })
            .filter(|(item, _)| filters.matches(item))
            .take(MAX_RECOMMENDATIONS)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;

    fn index() -> RecommendationIndex {
        let items = vec![
            Item::new(
                "Stranger Things".into(),
                "Kids in a small town face supernatural forces and secret government experiments."
                    .into(),
                "TV Dramas, Sci-Fi".into(),
                ItemKind::TvShow,
                2016,
            ),
            Item::new(
                "Dark".into(),
                "A missing child exposes secret experiments and time travel in a small town."
                    .into(),
                "TV Dramas, Sci-Fi".into(),
                ItemKind::TvShow,
                2017,
            ),
            Item::new(
                "Friends".into(),
                "Six friends share apartments and coffee in Manhattan.".into(),
                "Comedy".into(),
                ItemKind::TvShow,
                1994,
            ),
        ];
        RecommendationIndex::build(Catalog::from_items(items)).unwrap()
    }

    #[test]
    fn test_most_similar_title_ranks_first() {
        let results = index().recommend("Stranger Things", &RecommendationFilters::default());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Dark");
    }

    #[test]
    fn test_category_filter_excludes_non_matching() {
        let filters = RecommendationFilters::new(Some("Sci-Fi".into()), None);
        let results = index().recommend("Stranger Things", &filters);
        assert!(results.iter().all(|r| r.title != "Friends"));
        assert!(results.iter().any(|r| r.title == "Dark"));
    }

    #[test]
    fn test_year_filter_is_exact() {
        let filters = RecommendationFilters::new(None, Some(2017));
        let results = index().recommend("Stranger Things", &filters);
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Dark"]);
    }

    #[test]
    fn test_filter_exhaustion_is_empty() {
        let filters = RecommendationFilters::new(Some("Documentaries".into()), None);
        assert!(index().recommend("Stranger Things", &filters).is_empty());
    }

    #[test]
    fn test_unknown_seed_is_empty() {
        let results = index().recommend("totally-unknown-title", &RecommendationFilters::default());
        assert!(results.is_empty());
    }

    #[test]
    fn test_seed_lookup_is_case_insensitive() {
        let index = index();
        let filters = RecommendationFilters::default();
        assert_eq!(
            index.recommend("stranger things", &filters),
            index.recommend("Stranger Things", &filters)
        );
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let filters = RecommendationFilters::new(Some("  ".into()), Some(UNKNOWN_YEAR));
        assert_eq!(filters, RecommendationFilters::default());
    }

    #[test]
    fn test_output_capped_and_deterministic() {
        let items: Vec<Item> = (1..=15)
            .map(|n| {
                Item::new(
                    format!("T{}", n),
                    format!("Space crew adventure number{}", n),
                    "Sci-Fi".into(),
                    ItemKind::Movie,
                    2020,
                )
            })
            .collect();
        let index = RecommendationIndex::build(Catalog::from_items(items)).unwrap();
        let filters = RecommendationFilters::default();

        let first = index.recommend("T0", &filters);
        assert!(first.is_empty());

        let first = index.recommend("T15", &filters);
        let second = index.recommend("T15", &filters);
        assert_eq!(first.len(), MAX_RECOMMENDATIONS);
        assert_eq!(first, second);
        let titles: Vec<&str> = first.iter().map(|r| r.title.as_str()).collect();
        // every neighbour ties, so rank falls back to catalog order
        assert_eq!(
            titles,
            vec!["T1", "T2", "T3", "T4", "T5", "T6", "T7", "T8", "T9", "T10"]
        );
    }

    #[test]
    fn test_scores_are_non_increasing() {
        let index = index();
        let ranked = index.ranked("Dark", &RecommendationFilters::default());
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }
}
