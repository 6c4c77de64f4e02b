//! Resolves a transaction keyword into a single GIF URL.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::GifConfig;
use crate::gif::client::GifSearch;
use crate::gif::types::Resolution;
use crate::observability::metrics;

/// Holds the current GIF URL for a keyword input.
///
/// Only the most recent lookup may update the result; responses for a
/// superseded keyword are dropped.
pub struct KeywordGifResolver {
    search: Arc<dyn GifSearch>,
    limit: u32,
    fallback_url: String,
    current: watch::Sender<String>,
    epoch: AtomicU64,
}

impl KeywordGifResolver {
    pub fn new(search: Arc<dyn GifSearch>, config: &GifConfig) -> Self {
        let (current, _) = watch::channel(String::new());
        Self {
            search,
            limit: config.limit.max(1),
            fallback_url: config.fallback_url.clone(),
            current,
            epoch: AtomicU64::new(0),
        }
    }

    /// Current URL; empty until the first successful resolution.
    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// Look up `keyword` and make the result current.
    ///
    /// An empty keyword does nothing. Spaces are stripped before searching.
    /// Empty results and failures of any kind resolve to the fallback URL.
    pub async fn resolve(&self, keyword: &str) -> Resolution {
        if keyword.is_empty() {
            return Resolution::Skipped;
        }

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let query = strip_whitespace(keyword);

        let found = match self.search.search(&query, self.limit).await {
            Ok(response) => response.first_url().map(str::to_string),
            Err(e) => {
                tracing::debug!(keyword = %keyword, error = %e, "GIF lookup failed");
                None
            }
        };

        let (url, resolution) = match found {
            Some(url) => (url.clone(), Resolution::Found(url)),
            None => (
                self.fallback_url.clone(),
                Resolution::Fallback(self.fallback_url.clone()),
            ),
        };

        let applied = self.current.send_if_modified(|current| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            *current = url;
            true
        });

        if !applied {
            tracing::debug!(keyword = %keyword, "Discarding superseded GIF lookup");
            metrics::record_gif_lookup(Resolution::Stale.outcome());
            return Resolution::Stale;
        }

        metrics::record_gif_lookup(resolution.outcome());
        resolution
    }
}

fn strip_whitespace(keyword: &str) -> String {
    keyword.chars().filter(|c| !c.is_whitespace()).collect()
}
