//! Keyword to GIF resolution.
//!
//! # Data Flow
//! ```text
//! keyword → resolver.rs (strip spaces, generation check)
//!         → client.rs (HTTP search, limit 1)
//!         → first result's downsized_medium URL, or the fallback URL
//! ```

pub mod client;
pub mod resolver;
pub mod types;

pub use client::{GifSearch, GiphyClient};
pub use resolver::KeywordGifResolver;
pub use types::{GifError, Resolution, SearchResponse};
