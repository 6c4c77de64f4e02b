//! Keyword search over HTTP.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::GifConfig;
use crate::gif::types::{GifError, SearchResponse};

/// A keyword-to-GIF search service.
#[async_trait]
pub trait GifSearch: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<SearchResponse, GifError>;
}

/// Giphy-compatible search client.
#[derive(Debug, Clone)]
pub struct GiphyClient {
    http: reqwest::Client,
    endpoint: url::Url,
    api_key: String,
}

impl GiphyClient {
    pub fn new(config: &GifConfig) -> Result<Self, GifError> {
        let endpoint = url::Url::parse(&config.endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.api_key.is_empty() {
            tracing::warn!("GIF search API key is empty; lookups will likely fall back");
        }

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// Full request URL for a query.
    pub fn search_url(&self, query: &str, limit: u32) -> url::Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        url
    }
}

#[async_trait]
impl GifSearch for GiphyClient {
    async fn search(&self, query: &str, limit: u32) -> Result<SearchResponse, GifError> {
        let response = self.http.get(self.search_url(query, limit)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GifError::Status(status.as_u16()));
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let config = GifConfig {
            api_key: "k3y".into(),
            ..GifConfig::default()
        };
        let client = GiphyClient::new(&config).unwrap();
        let url = client.search_url("happydog", 1);
        assert_eq!(
            url.as_str(),
            "https://api.giphy.com/v1/gifs/search?api_key=k3y&q=happydog&limit=1"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = GifConfig {
            endpoint: "not a url".into(),
            ..GifConfig::default()
        };
        assert!(matches!(GiphyClient::new(&config), Err(GifError::Endpoint(_))));
    }
}
