use super::source_label;
use crate::traits::SourceParser;
use crate::types::{Article, RadarError, Result, SourceKind, SourceSpec};
use crate::utils::text::clean_text;
use async_trait::async_trait;
use feed_rs::model::Entry;
use feed_rs::parser;
use tracing::{debug, info};

/// RSS 0.9x/2.0, Atom and JSON Feed through feed-rs.
#[derive(Debug, Clone, Default)]
pub struct RssParser;

impl RssParser {
    pub fn new() -> Self {
        Self
    }

    /// Quick sniff for RSS/Atom markup before handing content to feed-rs.
    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();
        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel")
            || content.trim_start().starts_with('{')
    }

    fn convert_entry(entry: Entry, source_name: &str, language: Option<&str>) -> Article {
        let title = entry
            .title
            .map(|t| clean_text(&t.content))
            .unwrap_or_default();

        let url = entry.links.first().map(|link| link.href.clone());

        let description = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .map(|d| clean_text(&d))
            .unwrap_or_default();

        let tags: Vec<_> = entry
            .categories
            .into_iter()
            .map(|c| c.label.unwrap_or(c.term))
            .filter(|t| !t.trim().is_empty())
            .collect();

        let mut article = Article::new(title, source_name)
            .with_description(description)
            .with_tags(tags);
        article.url = url.filter(|u| !u.trim().is_empty());
        article.published_at = entry.published.or(entry.updated);
        article.author = entry
            .authors
            .first()
            .map(|a| a.name.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(language) = language {
            article.language = Some(language.to_string());
        }
        article
    }
}

#[async_trait]
impl SourceParser for RssParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }

    fn parse(&self, raw: &str, source: &SourceSpec) -> Result<Vec<Article>> {
        debug!("Parsing feed content ({} bytes)", raw.len());

        let feed = parser::parse(raw.as_bytes())
            .map_err(|e| RadarError::Parse(format!("Failed to parse feed {}: {}", source.url, e)))?;

        let feed_title = feed.title.map(|t| t.content);
        let source_name = source_label(source, feed_title.as_deref());
        let language = feed.language;

        let articles: Vec<Article> = feed
            .entries
            .into_iter()
            .take(source.max_articles)
            .map(|entry| Self::convert_entry(entry, &source_name, language.as_deref()))
            .collect();

        info!("Parsed {} entries from {}", articles.len(), source_name);
        Ok(articles)
    }
}
