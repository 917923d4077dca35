use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
// Use the interfaces crate for core types
pub use interfaces::defs::{Article, ArticleFilter, SourceKind, SourceSpec};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub min_host_interval_ms: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "AI-News-Radar/1.0".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 2,
            min_host_interval_ms: 1000,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Per-run counters. Created by the caller for one pipeline run and handed
/// back with the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub run_id: Uuid,
    pub total_fetched: usize,
    pub malformed: usize,
    pub after_time: usize,
    pub after_topic: usize,
    pub after_duplicate: usize,
    pub custom: Vec<(String, usize)>,
    pub total_kept: usize,
    pub cached: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            total_fetched: 0,
            malformed: 0,
            after_time: 0,
            after_topic: 0,
            after_duplicate: 0,
            custom: Vec::new(),
            total_kept: 0,
            cached: 0,
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a full aggregation run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub articles: Vec<Article>,
    pub stats: RunStats,
    pub sources_processed: usize,
    pub sources_failed: usize,
    pub duration_ms: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Filter '{name}' failed: {source}")]
    Filter {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, RadarError>;
