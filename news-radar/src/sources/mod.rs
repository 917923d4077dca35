pub mod html;
pub mod opml;
pub mod rss;

pub use html::HtmlParser;
pub use opml::{OpmlFeed, OpmlParser};
pub use rss::RssParser;

use crate::types::SourceSpec;
use crate::utils;

/// Name stamped on articles from `source`: the configured name, then `fallback`
/// (usually the feed title), then the domain of its URL.
pub(crate) fn source_label(source: &SourceSpec, fallback: Option<&str>) -> String {
    let configured = source.name.trim();
    if !configured.is_empty() {
        return configured.to_string();
    }
    if let Some(fallback) = fallback.map(str::trim).filter(|f| !f.is_empty()) {
        return fallback.to_string();
    }
    utils::url::extract_domain(&source.url).unwrap_or_else(|| source.url.trim().to_string())
}
