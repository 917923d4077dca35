use crate::config::FilterConfig;
use crate::filters::{DuplicateFilter, TimeFilter, TopicFilter};
use crate::types::{Article, ArticleFilter, RadarError, Result, RunStats};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Runs the built-in filters in a fixed order (time, topic, duplicate) and
/// then any registered custom filters, recording counts after every stage.
pub struct Pipeline {
    time: TimeFilter,
    topic: TopicFilter,
    duplicate: DuplicateFilter,
    custom: Vec<Box<dyn ArticleFilter>>,
}

impl Pipeline {
    /// Builds every stage, rejecting invalid configuration up front.
    pub fn new(config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            time: TimeFilter::new(&config.time)?,
            topic: TopicFilter::new(&config.keywords, &config.topic)?,
            duplicate: DuplicateFilter::new(config.duplicate.clone())?,
            custom: Vec::new(),
        })
    }

    /// Custom filters run after the built-in stages, in registration order.
    pub fn add_filter(&mut self, filter: Box<dyn ArticleFilter>) -> &mut Self {
        debug!("Registered custom filter '{}'", filter.name());
        self.custom.push(filter);
        self
    }

    pub fn with_filter(mut self, filter: Box<dyn ArticleFilter>) -> Self {
        self.add_filter(filter);
        self
    }

    pub fn stage_names(&self) -> Vec<String> {
        let mut names = vec![self.time.name(), self.topic.name(), self.duplicate.name()];
        names.extend(self.custom.iter().map(|f| f.name()));
        names
    }

    pub fn time_filter(&self) -> &TimeFilter {
        &self.time
    }

    pub fn topic_filter(&self) -> &TopicFilter {
        &self.topic
    }

    pub fn duplicate_filter(&self) -> &DuplicateFilter {
        &self.duplicate
    }

    pub fn run(&self, articles: Vec<Article>, stats: &mut RunStats) -> Result<Vec<Article>> {
        self.run_at(articles, Utc::now(), stats)
    }

    /// Same as `run` with an explicit clock for the time stage.
    pub fn run_at(
        &self,
        articles: Vec<Article>,
        now: DateTime<Utc>,
        stats: &mut RunStats,
    ) -> Result<Vec<Article>> {
        stats.total_fetched = articles.len();

        let articles: Vec<Article> = articles
            .into_iter()
            .filter(|article| {
                let ok = article.is_well_formed();
                if !ok {
                    debug!("Dropping malformed article without source: '{}'", article.title);
                }
                ok
            })
            .collect();
        stats.malformed = stats.total_fetched - articles.len();

        let articles = self.time.filter_at(articles, now);
        stats.after_time = articles.len();

        let articles = self.topic.filter(articles);
        stats.after_topic = articles.len();

        let mut articles = self.duplicate.filter(articles);
        stats.after_duplicate = articles.len();

        for filter in &self.custom {
            let name = filter.name();
            articles = filter
                .apply(articles)
                .map_err(|source| RadarError::Filter {
                    name: name.clone(),
                    source,
                })?;
            info!("Custom filter '{}': {} articles remain", name, articles.len());
            stats.custom.push((name, articles.len()));
        }

        stats.total_kept = articles.len();
        stats.cached = articles.iter().filter(|a| a.cached).count();

        info!(
            "Pipeline: fetched={} time={} topic={} duplicate={} kept={}",
            stats.total_fetched,
            stats.after_time,
            stats.after_topic,
            stats.after_duplicate,
            stats.total_kept
        );
        Ok(articles)
    }
}
