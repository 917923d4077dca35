use crate::fetcher::Fetcher;
use crate::types::{Article, Result, SourceKind, SourceSpec};
use async_trait::async_trait;

/// Turns one configured source into raw articles.
///
/// `fetch` returns the raw payload; `parse` is pure so payloads can be
/// replayed from the cache without touching the network.
#[async_trait]
pub trait SourceParser: Send + Sync {
    /// Source kind this parser handles
    fn kind(&self) -> SourceKind;

    async fn fetch(&self, fetcher: &Fetcher, url: &str) -> Result<String> {
        fetcher.fetch(url).await
    }

    /// Parse a payload into articles, at most `source.max_articles` of them.
    /// Every article carries a non-empty `source`.
    fn parse(&self, raw: &str, source: &SourceSpec) -> Result<Vec<Article>>;
}
