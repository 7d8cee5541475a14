use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::Item,
    services::stop_words::ENGLISH_STOP_WORDS,
};

/// Sparse TF-IDF vector: `(dimension, weight)` pairs sorted by dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    pub fn from_sorted(entries: Vec<(u32, f64)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { entries }
    }

    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product via a merge over both sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_w) = self.entries[i];
            let (b_dim, b_w) = other.entries[j];
            match a_dim.cmp(&b_dim) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Term → dimension mapping, ordered lexicographically
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: BTreeMap<String, u32>,
    idf: Vec<f64>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn dimension(&self, term: &str) -> Option<u32> {
        self.terms.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.dimension(term).map(|d| self.idf[d as usize])
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

fn stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// Lower-cases text and splits it into terms of two or more word characters,
/// skipping stop words
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !stop_words().contains(token))
        .map(str::to_string)
        .collect()
}

/// Builds the corpus vocabulary and one L2-normalized TF-IDF vector per item
///
/// IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`. Output vectors follow the
/// input order. An empty corpus is a configuration error.
pub fn build_vocabulary_and_vectors(items: &[Item]) -> AppResult<(Vocabulary, Vec<SparseVector>)> {
    if items.is_empty() {
        return Err(AppError::Configuration(
            "Cannot vectorize an empty catalog".to_string(),
        ));
    }

    let counts: Vec<HashMap<String, u32>> = items
        .iter()
        .map(|item| {
            let mut tf = HashMap::new();
            for term in tokenize(&item.content) {
                *tf.entry(term).or_insert(0) += 1;
            }
            tf
        })
        .collect();

    let mut doc_freq: BTreeMap<String, u32> = BTreeMap::new();
    for tf in &counts {
        for term in tf.keys() {
            *doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
    }

    let n = items.len() as f64;
    let mut terms = BTreeMap::new();
    let mut idf = Vec::with_capacity(doc_freq.len());
    for (dimension, (term, df)) in doc_freq.into_iter().enumerate() {
        idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        terms.insert(term, dimension as u32);
    }
    let vocabulary = Vocabulary { terms, idf };

    let vectors = counts
        .into_iter()
        .map(|tf| weigh(&vocabulary, tf))
        .collect();

    tracing::debug!(
        documents = items.len(),
        vocabulary = vocabulary.len(),
        "TF-IDF vectors built"
    );

    Ok((vocabulary, vectors))
}

fn weigh(vocabulary: &Vocabulary, tf: HashMap<String, u32>) -> SparseVector {
    let mut entries: Vec<(u32, f64)> = tf
        .into_iter()
        .filter_map(|(term, count)| {
            let dimension = vocabulary.dimension(&term)?;
            Some((dimension, count as f64 * vocabulary.idf[dimension as usize]))
        })
        .collect();
    entries.sort_by_key(|(dimension, _)| *dimension);

    let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in &mut entries {
            *weight /= norm;
        }
    }

    SparseVector::from_sorted(entries)
}
