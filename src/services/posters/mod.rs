//! Poster image lookup
//!
//! Posters come from an external metadata service. Lookups never share state
//! with the recommendation index, and any failure degrades to a placeholder
//! image rather than an error.

use crate::{error::AppResult, models::Poster};

pub mod omdb;

pub use omdb::OmdbProvider;

const PLACEHOLDER_BASE: &str = "https://via.placeholder.com/300x450?text=";

/// Trait for poster image sources
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Poster URL for a title, `None` when the source has no image for it
    async fn lookup(&self, title: &str) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Placeholder image URL carrying the title as its caption
pub fn placeholder_url(title: &str) -> String {
    format!("{}{}", PLACEHOLDER_BASE, title.replace(' ', "+"))
}

/// Resolves a poster for `title`, falling back to the placeholder on a miss
/// or on any provider error
pub async fn fetch_poster(provider: &dyn PosterProvider, title: &str) -> Poster {
    match provider.lookup(title).await {
        Ok(Some(url)) => Poster {
            title: title.to_string(),
            url,
            found: true,
        },
        Ok(None) => {
            tracing::debug!(title = %title, provider = provider.name(), "No poster found");
            placeholder(title)
        }
        Err(e) => {
            tracing::warn!(
                title = %title,
                provider = provider.name(),
                error = %e,
                "Poster lookup failed"
            );
            placeholder(title)
        }
    }
}

fn placeholder(title: &str) -> Poster {
    Poster {
        title: title.to_string(),
        url: placeholder_url(title),
        found: false,
    }
}
