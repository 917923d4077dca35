use crate::types::{Article, Result, RunStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const STORAGE_VERSION: &str = "1.0";

/// On-disk shape of a saved run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRun {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    #[serde(default)]
    pub stats: Option<RunStats>,
    pub articles: Vec<Article>,
}

/// Pretty JSON file holding the articles of the latest run.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the envelope, first copying any existing file to `<path>.bak`.
    pub fn save(&self, articles: &[Article], stats: &RunStats) -> Result<()> {
        ensure_parent(&self.path)?;

        if self.path.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup)?;
        }

        let run = StoredRun {
            version: STORAGE_VERSION.to_string(),
            generated_at: Utc::now(),
            count: articles.len(),
            stats: Some(stats.clone()),
            articles: articles.to_vec(),
        };

        let json = serde_json::to_string_pretty(&run)?;
        fs::write(&self.path, json)?;
        info!("Saved {} articles to {}", articles.len(), self.path.display());
        Ok(())
    }

    /// Articles from a previous save. A missing file is an empty run.
    pub fn load(&self) -> Result<Vec<Article>> {
        if !self.path.exists() {
            warn!("No saved articles at {}", self.path.display());
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        let run: StoredRun = serde_json::from_str(&raw)?;
        info!("Loaded {} articles from {}", run.articles.len(), self.path.display());
        Ok(run.articles)
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }
}

/// Flat CSV export, one row per article.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

const CSV_HEADER: [&str; 11] = [
    "title",
    "url",
    "description",
    "publishedAt",
    "source",
    "tags",
    "author",
    "language",
    "aiScore",
    "cached",
    "duplicateSources",
];

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, articles: &[Article]) -> Result<()> {
        ensure_parent(&self.path)?;

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(CSV_HEADER)?;

        for article in articles {
            writer.write_record([
                article.title.clone(),
                article.url.clone().unwrap_or_default(),
                article.description.clone(),
                article
                    .published_at
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_default(),
                article.source.clone(),
                article.tags.join(";"),
                article.author.clone().unwrap_or_default(),
                article.language.clone().unwrap_or_default(),
                article
                    .ai_score
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_default(),
                article.cached.to_string(),
                article.duplicate_sources.join(";"),
            ])?;
        }

        writer.flush()?;
        info!("Exported {} articles to {}", articles.len(), self.path.display());
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
