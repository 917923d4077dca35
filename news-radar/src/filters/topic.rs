use crate::config::{KeywordConfig, TopicFilterConfig};
use crate::types::{Article, ArticleFilter, RadarError, Result};
use regex::Regex;
use tracing::{debug, info};

pub const PRIMARY_WEIGHT: f64 = 1.0;
pub const SECONDARY_WEIGHT: f64 = 0.7;
pub const ALIAS_WEIGHT: f64 = 0.5;

struct Keyword {
    phrase: String,
    pattern: Regex,
}

struct Tier {
    weight: f64,
    keywords: Vec<Keyword>,
}

impl Tier {
    fn compile(weight: f64, phrases: &[String]) -> Result<Self> {
        let mut keywords = Vec::new();
        for phrase in phrases {
            let phrase = phrase.trim().to_lowercase();
            if phrase.is_empty() {
                continue;
            }
            // Letters and digits on either side break the match, so "ai"
            // does not hit "brain" or "said".
            let pattern = Regex::new(&format!(
                r"(?:^|[^\p{{L}}\p{{N}}]){}(?:$|[^\p{{L}}\p{{N}}])",
                regex::escape(&phrase)
            ))
            .map_err(|e| RadarError::Config(format!("bad keyword '{}': {}", phrase, e)))?;
            keywords.push(Keyword { phrase, pattern });
        }
        Ok(Self { weight, keywords })
    }

    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| k.pattern.is_match(text))
    }
}

/// Scores articles against three keyword tiers and keeps those at or above
/// `min_score`. The score is the weight of the best matching tier.
pub struct TopicFilter {
    tiers: Vec<Tier>,
    min_score: f64,
}

impl TopicFilter {
    pub fn new(keywords: &KeywordConfig, config: &TopicFilterConfig) -> Result<Self> {
        config.validate()?;

        // Highest weight first so scoring can stop at the first hit.
        let tiers = vec![
            Tier::compile(PRIMARY_WEIGHT, &keywords.primary)?,
            Tier::compile(SECONDARY_WEIGHT, &keywords.secondary)?,
            Tier::compile(ALIAS_WEIGHT, &keywords.aliases)?,
        ];

        debug!(
            "Topic filter initialized with {}/{}/{} keywords",
            tiers[0].keywords.len(),
            tiers[1].keywords.len(),
            tiers[2].keywords.len()
        );

        Ok(Self {
            tiers,
            min_score: config.min_score,
        })
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn score(&self, article: &Article) -> f64 {
        let text = searchable_text(article);
        if text.trim().is_empty() {
            return 0.0;
        }

        self.tiers
            .iter()
            .find(|tier| tier.matches(&text))
            .map(|tier| tier.weight)
            .unwrap_or(0.0)
    }

    /// Retained articles come back with `ai_score` attached, in input order.
    pub fn filter(&self, articles: Vec<Article>) -> Vec<Article> {
        let total = articles.len();

        let kept: Vec<Article> = articles
            .into_iter()
            .filter_map(|mut article| {
                let score = self.score(&article);
                if score >= self.min_score {
                    article.ai_score = Some(score);
                    Some(article)
                } else {
                    debug!("Topic filter dropping '{}' (score {:.1})", article.title, score);
                    None
                }
            })
            .collect();

        info!(
            "Topic Filter: {}/{} articles passed (min_score={})",
            kept.len(),
            total,
            self.min_score
        );
        kept
    }

    /// Every keyword that matches, primary tier first.
    pub fn matched_keywords(&self, article: &Article) -> Vec<String> {
        let text = searchable_text(article);
        self.tiers
            .iter()
            .flat_map(|tier| tier.keywords.iter())
            .filter(|k| k.pattern.is_match(&text))
            .map(|k| k.phrase.clone())
            .collect()
    }

    /// Highest score first. Ties keep their input order.
    pub fn sort_by_relevance(&self, articles: Vec<Article>) -> Vec<Article> {
        let mut scored: Vec<Article> = articles
            .into_iter()
            .map(|mut article| {
                if article.ai_score.is_none() {
                    article.ai_score = Some(self.score(&article));
                }
                article
            })
            .collect();

        scored.sort_by(|a, b| {
            let score_a = a.ai_score.unwrap_or(0.0);
            let score_b = b.ai_score.unwrap_or(0.0);
            score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored
    }
}

impl ArticleFilter for TopicFilter {
    fn name(&self) -> String {
        "topic".to_string()
    }

    fn apply(&self, articles: Vec<Article>) -> anyhow::Result<Vec<Article>> {
        Ok(self.filter(articles))
    }
}

fn searchable_text(article: &Article) -> String {
    let tags = article.tags.join(" ");
    let mut parts: Vec<&str> = Vec::new();
    if !article.title.is_empty() {
        parts.push(&article.title);
    }
    if !article.description.is_empty() {
        parts.push(&article.description);
    }
    if !tags.is_empty() {
        parts.push(&tags);
    }
    parts.join(" ").to_lowercase()
}
