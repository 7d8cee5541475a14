pub mod catalog;
pub mod index;
pub mod posters;
pub mod recommendations;
pub mod similarity;
pub mod stop_words;
pub mod vectorizer;

pub use index::SharedIndex;
pub use recommendations::{RecommendationFilters, RecommendationIndex, MAX_RECOMMENDATIONS};
