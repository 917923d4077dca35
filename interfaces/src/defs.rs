use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One normalized piece of aggregated content.
///
/// Identity fields (`title`, `url`, `description`, `published_at`, `source`,
/// `tags`) are fixed once a parser produces the record. Filters only attach
/// `ai_score`; `cached` belongs to the fetch layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    pub title: String,
    pub url: Option<String>,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicate_sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<f64>,
    pub cached: bool,
}

impl Article {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            language: Some("en".to_owned()),
            ..Default::default()
        }
    }

    /// Blank URLs are stored as absent.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let trimmed = url.trim();
        self.url = if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) };
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    /// A record without a source name cannot be attributed and is not
    /// forwarded. An empty title is tolerated.
    pub fn is_well_formed(&self) -> bool {
        !self.source.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Rss,
    Html,
    Opml,
}

/// Where articles come from and how to read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub max_articles: usize,
    pub selector: Option<String>,
    pub field_selectors: HashMap<String, String>,
    pub max_feeds: usize,
    pub max_articles_per_feed: usize,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            kind: SourceKind::Rss,
            max_articles: 20,
            selector: None,
            field_selectors: HashMap::new(),
            max_feeds: 10,
            max_articles_per_feed: 10,
        }
    }
}

impl SourceSpec {
    pub fn rss(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }
}

// Object style note:
// Filters are handed the whole article sequence for one run and return the
// retained subsequence. They should not keep state across calls; anything a
// filter needs to remember while scanning lives inside a single `apply`.

pub trait ArticleFilter: Send + Sync {
    fn name(&self) -> String;
    fn apply(&self, articles: Vec<Article>) -> anyhow::Result<Vec<Article>>;
}
