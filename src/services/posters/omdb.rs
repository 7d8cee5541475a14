//! OMDb poster provider
//!
//! Single call per title: `GET /?t={title}&apikey={key}`. OMDb answers with
//! HTTP 200 even for unknown titles and signals the miss in `Response`.

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::posters::PosterProvider,
};

/// Subset of the OMDb title response used for posters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: String,
    #[serde(default)]
    poster: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl OmdbResponse {
    fn poster_url(self) -> Option<String> {
        if self.response != "True" {
            return None;
        }
        self.poster.filter(|p| p != "N/A" && !p.is_empty())
    }
}

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl PosterProvider for OmdbProvider {
    async fn lookup(&self, title: &str) -> AppResult<Option<String>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }

        let url = format!("{}/", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let body: OmdbResponse = response.json().await?;
        if let Some(error) = body.error.as_deref() {
            tracing::debug!(title = %title, error = %error, provider = "omdb", "OMDb miss");
        }

        Ok(body.poster_url())
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> OmdbResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_poster_returned_when_found() {
        let body = parse(r#"{"Title":"Narcos","Poster":"https://m.media-amazon.com/narcos.jpg","Response":"True"}"#);
        assert_eq!(
            body.poster_url().as_deref(),
            Some("https://m.media-amazon.com/narcos.jpg")
        );
    }

    #[test]
    fn test_na_poster_is_a_miss() {
        let body = parse(r#"{"Title":"Obscure","Poster":"N/A","Response":"True"}"#);
        assert_eq!(body.poster_url(), None);
    }

    #[test]
    fn test_false_response_is_a_miss() {
        let body = parse(r#"{"Response":"False","Error":"Movie not found!"}"#);
        assert_eq!(body.error.as_deref(), Some("Movie not found!"));
        assert_eq!(body.poster_url(), None);
    }

    #[test]
    fn test_trailing_slash_trimmed_from_base_url() {
        let provider = OmdbProvider::new("key".into(), "https://www.omdbapi.com/".into());
        assert_eq!(provider.api_url, "https://www.omdbapi.com");
        assert_eq!(provider.name(), "omdb");
    }
}
