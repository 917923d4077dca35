use crate::cache::CacheHandle;
use crate::config::RadarConfig;
use crate::pipeline::Pipeline;
use crate::sources::{HtmlParser, OpmlParser, RssParser};
use crate::traits::SourceParser;
use crate::types::{Article, ArticleFilter, Result, RunReport, RunStats, SourceKind, SourceSpec};
use crate::utils;
use crate::Fetcher;
use chrono::Utc;
use futures::future::join_all;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Fetches every configured source and runs the result through the pipeline.
pub struct NewsRadar {
    config: RadarConfig,
    fetcher: Fetcher,
    rss: RssParser,
    html: HtmlParser,
    opml: OpmlParser,
    pipeline: Pipeline,
}

impl NewsRadar {
    pub fn new(config: RadarConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::new(config.fetch.clone())?;
        let pipeline = Pipeline::new(&config.filters)?;

        Ok(Self {
            config,
            fetcher,
            rss: RssParser::new(),
            html: HtmlParser::new(),
            opml: OpmlParser::new(),
            pipeline,
        })
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn add_filter(&mut self, filter: Box<dyn ArticleFilter>) -> &mut Self {
        self.pipeline.add_filter(filter);
        self
    }

    /// One full run. A source that fails is logged and counted; only
    /// pipeline errors fail the run.
    pub async fn aggregate(&self) -> Result<RunReport> {
        let started = Instant::now();
        let cache = self.cache_handle();
        let sources = &self.config.sources;

        info!("Collecting from {} sources", sources.len());

        let results = join_all(
            sources
                .iter()
                .map(|source| self.collect_source(source, cache.as_ref())),
        )
        .await;

        let mut collected = Vec::new();
        let mut sources_processed = 0;
        let mut sources_failed = 0;

        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(articles) => {
                    info!("{}: {} articles", source.name, articles.len());
                    sources_processed += 1;
                    collected.extend(articles);
                }
                Err(e) => {
                    error!("Failed to collect from {} ({}): {}", source.name, source.url, e);
                    sources_failed += 1;
                }
            }
        }

        let report = self.finish(collected, sources_processed, sources_failed, started)?;

        if let Some(cache) = &cache {
            if let Err(e) = cache.cleanup_expired().await {
                warn!("Cache cleanup failed: {}", e);
            }
        }
        Ok(report)
    }

    /// Run already-collected articles through the pipeline.
    pub fn process(&self, articles: Vec<Article>) -> Result<RunReport> {
        self.finish(articles, 0, 0, Instant::now())
    }

    fn finish(
        &self,
        articles: Vec<Article>,
        sources_processed: usize,
        sources_failed: usize,
        started: Instant,
    ) -> Result<RunReport> {
        let mut stats = RunStats::new();
        let articles = self.pipeline.run(articles, &mut stats)?;

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "Run {} finished in {}ms: kept {} of {} articles ({} sources ok, {} failed)",
            stats.run_id, duration_ms, stats.total_kept, stats.total_fetched, sources_processed, sources_failed
        );

        Ok(RunReport {
            articles,
            stats,
            sources_processed,
            sources_failed,
            duration_ms,
            generated_at: Utc::now(),
        })
    }

    fn cache_handle(&self) -> Option<CacheHandle> {
        if self.config.enable_cache {
            Some(CacheHandle::from_hours(
                self.config.cache_dir.clone(),
                self.config.cache_ttl_hours,
            ))
        } else {
            None
        }
    }

    async fn collect_source(
        &self,
        source: &SourceSpec,
        cache: Option<&CacheHandle>,
    ) -> Result<Vec<Article>> {
        match source.kind {
            SourceKind::Rss => self.read_source(&self.rss, source, cache).await,
            SourceKind::Html => self.read_source(&self.html, source, cache).await,
            SourceKind::Opml => self.read_opml(source, cache).await,
        }
    }

    async fn read_source(
        &self,
        parser: &dyn SourceParser,
        source: &SourceSpec,
        cache: Option<&CacheHandle>,
    ) -> Result<Vec<Article>> {
        let (raw, cached) = self.load_payload(parser, &source.url, cache).await?;
        let mut articles = parser.parse(&raw, source)?;

        for article in &mut articles {
            if article.source.trim().is_empty() {
                article.source = source.name.clone();
            }
            article.cached = cached;
        }
        Ok(articles)
    }

    /// Expand an OPML list into its feeds and collect each one. Feeds that
    /// fail are skipped; the list itself failing fails the source.
    async fn read_opml(
        &self,
        source: &SourceSpec,
        cache: Option<&CacheHandle>,
    ) -> Result<Vec<Article>> {
        let raw = if utils::url::is_remote(&source.url) {
            self.load_payload(&self.rss, &source.url, cache).await?.0
        } else {
            tokio::fs::read_to_string(&source.url).await?
        };

        let feeds = self.opml.feed_sources(&raw, source)?;
        info!("{}: expanding {} feeds", source.name, feeds.len());

        let results = join_all(
            feeds
                .iter()
                .map(|feed| self.read_source(&self.rss, feed, cache)),
        )
        .await;

        let mut articles = Vec::new();
        for (feed, result) in feeds.iter().zip(results) {
            match result {
                Ok(found) => articles.extend(found),
                Err(e) => warn!("Skipping OPML feed {}: {}", feed.url, e),
            }
        }
        Ok(articles)
    }

    /// Raw payload for `url` and whether it came from the cache.
    async fn load_payload(
        &self,
        parser: &dyn SourceParser,
        url: &str,
        cache: Option<&CacheHandle>,
    ) -> Result<(String, bool)> {
        if let Some(cache) = cache {
            if let Some(raw) = cache.get(url).await {
                debug!("Using cached payload for {}", url);
                return Ok((raw, true));
            }
        }

        let raw = parser.fetch(&self.fetcher, url).await?;

        if let Some(cache) = cache {
            if let Err(e) = cache.set(url, &raw).await {
                warn!("Failed to cache {}: {}", url, e);
            }
        }
        Ok((raw, false))
    }
}
