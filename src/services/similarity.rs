use rayon::prelude::*;

use crate::services::vectorizer::SparseVector;

/// Dense, precomputed pairwise cosine similarity over a static catalog
///
/// Scores are stored row-major as `f64`. Building is O(n²·d); lookups read a
/// single precomputed row.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    size: usize,
    scores: Vec<f64>,
}

/// Cosine similarity of two sparse vectors, 0 when either has zero norm
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    cosine_with_norms(a, b, a.norm(), b.norm())
}

fn cosine_with_norms(a: &SparseVector, b: &SparseVector, norm_a: f64, norm_b: f64) -> f64 {
    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return 0.0;
    }

    let result = a.dot(b) / denom;
    if !result.is_finite() {
        return 0.0;
    }
    result.clamp(0.0, 1.0)
}

impl SimilarityIndex {
    pub fn build(vectors: &[SparseVector]) -> Self {
        let size = vectors.len();
        let norms: Vec<f64> = vectors.iter().map(SparseVector::norm).collect();
        let mut scores = vec![0.0f64; size * size];

        if size > 0 {
            scores
                .par_chunks_mut(size)
                .enumerate()
                .for_each(|(i, row)| {
                    for (j, cell) in row.iter_mut().enumerate() {
                        *cell = if i == j {
                            1.0
                        } else {
                            cosine_with_norms(&vectors[i], &vectors[j], norms[i], norms[j])
                        };
                    }
                });
        }

        tracing::debug!(items = size, "Similarity matrix built");

        Self { size, scores }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Similarity between two items, `None` when either index is out of range
    pub fn score(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.size && j < self.size).then(|| self.scores[i * self.size + j])
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.size).then(|| &self.scores[i * self.size..(i + 1) * self.size])
    }

    /// All other items ordered by descending score, ties by ascending index
    pub fn neighbors(&self, i: usize) -> Vec<(usize, f64)> {
        let Some(row) = self.row(i) else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .collect();
        // stable sort keeps ascending index among equal scores
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}
