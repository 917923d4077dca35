use crate::types::{FetchConfig, RadarError, Result, SourceSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeFilterConfig {
    /// Trailing window in hours. Must be positive.
    pub window_hours: i64,
}

impl Default for TimeFilterConfig {
    fn default() -> Self {
        Self { window_hours: 24 }
    }
}

/// Largest accepted window: 10,000 years, well inside chrono's date range.
pub const MAX_WINDOW_HOURS: i64 = 24 * 365 * 10_000;

impl TimeFilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_hours <= 0 || self.window_hours > MAX_WINDOW_HOURS {
            return Err(RadarError::Config(format!(
                "window_hours must be between 1 and {} hours, got {}",
                MAX_WINDOW_HOURS, self.window_hours
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicFilterConfig {
    /// Articles scoring below this are dropped. 0.0 admits everything.
    pub min_score: f64,
}

impl Default for TopicFilterConfig {
    fn default() -> Self {
        Self { min_score: 0.5 }
    }
}

impl TopicFilterConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("min_score", self.min_score)
    }
}

/// Relevance vocabulary, one list per tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub aliases: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            primary: to_strings(&[
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "neural network",
                "natural language processing",
                "computer vision",
                "generative ai",
                "large language model",
                "llm",
            ]),
            secondary: to_strings(&[
                "chatgpt",
                "gpt",
                "openai",
                "anthropic",
                "claude",
                "hugging face",
                "transformer",
                "bert",
                "stable diffusion",
                "midjourney",
            ]),
            aliases: to_strings(&["ai", "ml", "ai/ml", "nlp", "cv"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    pub by_url: bool,
    pub by_title: bool,
    /// With `by_title` on, also compare titles by similarity ratio. Exact
    /// case-folded matching applies regardless.
    pub fuzzy_titles: bool,
    pub title_similarity_threshold: f64,
    pub by_content: bool,
    /// Query keys dropped during URL normalization. A trailing `_` makes the
    /// entry a prefix (`utm_` covers `utm_source`, `utm_medium`, ...).
    pub tracking_params: Vec<String>,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            by_url: true,
            by_title: true,
            fuzzy_titles: true,
            title_similarity_threshold: 0.85,
            by_content: false,
            tracking_params: to_strings(&["utm_", "ref", "fbclid", "gclid"]),
        }
    }
}

impl DuplicateConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("title_similarity_threshold", self.title_similarity_threshold)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub time: TimeFilterConfig,
    pub topic: TopicFilterConfig,
    pub keywords: KeywordConfig,
    pub duplicate: DuplicateConfig,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        self.time.validate()?;
        self.topic.validate()?;
        self.duplicate.validate()
    }
}

/// Top-level settings, usually read from `radar.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub filters: FilterConfig,
    pub fetch: FetchConfig,
    pub sources: Vec<SourceSpec>,
    pub enable_cache: bool,
    pub cache_dir: PathBuf,
    pub cache_ttl_hours: i64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            fetch: FetchConfig::default(),
            sources: Vec::new(),
            enable_cache: true,
            cache_dir: PathBuf::from(".cache"),
            cache_ttl_hours: 1,
        }
    }
}

impl RadarConfig {
    /// Load from a TOML file. A missing file yields the defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found: {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)
            .map_err(|e| RadarError::Config(format!("{}: {}", path.display(), e)))?;

        info!(
            "Loaded config from {} ({} sources)",
            path.display(),
            config.sources.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| RadarError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.filters.validate()?;
        if self.enable_cache && self.cache_ttl_hours < 0 {
            return Err(RadarError::Config(format!(
                "cache_ttl_hours must not be negative, got {}",
                self.cache_ttl_hours
            )));
        }
        for source in &self.sources {
            if source.url.trim().is_empty() {
                return Err(RadarError::Config(format!(
                    "source '{}' has no url",
                    source.name
                )));
            }
        }
        Ok(())
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RadarError::Config(format!(
            "{} must be within [0, 1], got {}",
            field, value
        )));
    }
    Ok(())
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
