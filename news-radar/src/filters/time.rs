use crate::config::TimeFilterConfig;
use crate::types::{Article, ArticleFilter, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

/// Keeps articles published inside a trailing window.
///
/// Missing dates never pass. Dates in the future do; the declared value is
/// trusted as-is.
#[derive(Debug, Clone)]
pub struct TimeFilter {
    window_hours: i64,
}

impl TimeFilter {
    pub fn new(config: &TimeFilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            window_hours: config.window_hours,
        })
    }

    pub fn window_hours(&self) -> i64 {
        self.window_hours
    }

    /// Earliest kept publish time. Saturates at chrono's minimum date.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::hours(self.window_hours))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_within_window(&self, published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match published_at {
            Some(date) => date >= self.cutoff(now),
            None => false,
        }
    }

    pub fn filter(&self, articles: Vec<Article>) -> Vec<Article> {
        self.filter_at(articles, Utc::now())
    }

    /// Same as `filter` with an explicit clock.
    pub fn filter_at(&self, articles: Vec<Article>, now: DateTime<Utc>) -> Vec<Article> {
        let total = articles.len();

        let kept: Vec<Article> = articles
            .into_iter()
            .filter(|article| {
                let keep = self.is_within_window(article.published_at, now);
                if !keep {
                    debug!(
                        "Time filter dropping '{}' (published {:?})",
                        article.title, article.published_at
                    );
                }
                keep
            })
            .collect();

        info!(
            "Time Filter: {}/{} articles within last {} hours",
            kept.len(),
            total,
            self.window_hours
        );
        kept
    }
}

impl ArticleFilter for TimeFilter {
    fn name(&self) -> String {
        "time".to_string()
    }

    fn apply(&self, articles: Vec<Article>) -> anyhow::Result<Vec<Article>> {
        Ok(self.filter(articles))
    }
}
