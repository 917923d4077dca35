use super::source_label;
use crate::dates::{parse_date, WithPublishedStr};
use crate::traits::SourceParser;
use crate::types::{Article, RadarError, Result, SourceKind, SourceSpec};
use crate::utils::{text::clean_text, url::resolve};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

pub const DEFAULT_CONTAINER_SELECTOR: &str = "article";

const DEFAULT_FIELD_SELECTORS: [(&str, &str); 6] = [
    ("title", "h2, h3, .title"),
    ("link", "a[href]"),
    ("description", "p, .description, .summary"),
    ("date", "time, .date"),
    ("author", ".author"),
    ("tags", ".tag, .category"),
];

/// Compiled selectors for one source.
struct FieldSelectors {
    container: Selector,
    title: Selector,
    link: Selector,
    description: Selector,
    date: Selector,
    author: Selector,
    tags: Selector,
}

impl FieldSelectors {
    fn for_source(source: &SourceSpec) -> Result<Self> {
        let container = compile(
            source
                .selector
                .as_deref()
                .unwrap_or(DEFAULT_CONTAINER_SELECTOR),
        )?;

        let field = |name: &str| -> Result<Selector> {
            let configured = source.field_selectors.get(name).map(String::as_str);
            let fallback = DEFAULT_FIELD_SELECTORS
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, selector)| *selector)
                .unwrap_or("*");
            compile(configured.unwrap_or(fallback))
        };

        Ok(Self {
            container,
            title: field("title")?,
            link: field("link")?,
            description: field("description")?,
            date: field("date")?,
            author: field("author")?,
            tags: field("tags")?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| RadarError::Config(format!("invalid CSS selector '{}': {}", selector, e)))
}

/// Scrapes article listings out of plain HTML pages.
#[derive(Debug, Clone, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    fn extract(
        element: ElementRef<'_>,
        selectors: &FieldSelectors,
        source: &SourceSpec,
        source_name: &str,
    ) -> Option<Article> {
        let title = first_text(element, &selectors.title).unwrap_or_default();
        let url = element
            .select(&selectors.link)
            .find_map(|link| link.value().attr("href"))
            .and_then(|href| resolve(&source.url, href));

        if title.is_empty() && url.is_none() {
            return None;
        }

        // Prefer a machine-readable `datetime` attribute over the visible text.
        let raw_date = element
            .select(&selectors.date)
            .next()
            .map(|date| match date.value().attr("datetime") {
                Some(value) if parse_date(value).is_some() => value.to_string(),
                _ => element_text(date),
            })
            .unwrap_or_default();

        let tags: Vec<String> = element
            .select(&selectors.tags)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();

        let mut article = Article::new(title, source_name)
            .with_description(first_text(element, &selectors.description).unwrap_or_default())
            .with_tags(tags)
            .with_published_str(&raw_date);
        article.url = url;
        article.author = first_text(element, &selectors.author);
        Some(article)
    }
}

#[async_trait]
impl SourceParser for HtmlParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Html
    }

    fn parse(&self, raw: &str, source: &SourceSpec) -> Result<Vec<Article>> {
        let selectors = FieldSelectors::for_source(source)?;
        let document = Html::parse_document(raw);
        let source_name = source_label(source, None);

        let mut articles = Vec::new();
        for element in document.select(&selectors.container) {
            if articles.len() >= source.max_articles {
                break;
            }
            match Self::extract(element, &selectors, source, &source_name) {
                Some(article) => articles.push(article),
                None => debug!("Skipping element without title or link on {}", source.url),
            }
        }

        info!("Scraped {} articles from {}", articles.len(), source_name);
        Ok(articles)
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}
