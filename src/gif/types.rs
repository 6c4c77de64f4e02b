//! GIF search response types and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Search response. Only the fields the resolver reads are modelled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<GifObject>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GifObject {
    #[serde(default)]
    pub images: GifImages,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GifImages {
    pub downsized_medium: Option<GifImage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GifImage {
    pub url: String,
}

impl SearchResponse {
    /// Medium-downsized URL of the first result, if there is one.
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|gif| gif.images.downsized_medium.as_ref())
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// Errors from the GIF search boundary.
#[derive(Debug, Error)]
pub enum GifError {
    #[error("invalid search endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search endpoint returned HTTP {0}")]
    Status(u16),
}

/// Outcome of a keyword resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Empty keyword; the current result was left as it was.
    Skipped,
    /// The first result's URL is now current.
    Found(String),
    /// Nothing usable came back; the fallback URL is now current.
    Fallback(String),
    /// A newer lookup started meanwhile; this response was discarded.
    Stale,
}

impl Resolution {
    /// Short label used for metrics and CLI output.
    pub fn outcome(&self) -> &'static str {
        match self {
            Resolution::Skipped => "skipped",
            Resolution::Found(_) => "hit",
            Resolution::Fallback(_) => "fallback",
            Resolution::Stale => "stale",
        }
    }
}
