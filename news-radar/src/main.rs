use chrono::Utc;
use clap::{Parser, ValueEnum};
use news_radar::dates::time_ago;
use news_radar::utils::text::truncate;
use news_radar::{CsvStorage, JsonStorage, NewsRadar, RadarConfig, RunReport};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

/// Collect recent AI news from configured sources and keep the relevant, unique items.
#[derive(Debug, Parser)]
#[command(name = "news-radar", version)]
struct Cli {
    /// Path to the TOML configuration
    #[arg(long, default_value = "radar.toml")]
    config: PathBuf,

    /// Override the time window in hours
    #[arg(long)]
    hours: Option<i64>,

    /// Override the minimum relevance score
    #[arg(long)]
    min_score: Option<f64>,

    /// Disable duplicate detection
    #[arg(long)]
    no_dedup: bool,

    /// Where to write the results
    #[arg(long, default_value = "data/news.json")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Run without writing any output
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut RadarConfig) {
        if let Some(hours) = self.hours {
            config.filters.time.window_hours = hours;
        }
        if let Some(min_score) = self.min_score {
            config.filters.topic.min_score = min_score;
        }
        if self.no_dedup {
            config.filters.duplicate.by_url = false;
            config.filters.duplicate.by_title = false;
            config.filters.duplicate.by_content = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("Starting News Radar");

    let mut config = RadarConfig::load(&cli.config)?;
    cli.apply_overrides(&mut config);

    let radar = NewsRadar::new(config).map_err(|e| {
        error!("Invalid configuration: {}", e);
        Box::new(e) as Box<dyn std::error::Error>
    })?;

    let report = radar.aggregate().await?;
    print_summary(&report);

    if cli.dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    match cli.format {
        OutputFormat::Json => JsonStorage::new(&cli.output).save(&report.articles, &report.stats)?,
        OutputFormat::Csv => CsvStorage::new(&cli.output).save(&report.articles)?,
    }

    info!("News Radar finished");
    Ok(())
}

fn print_summary(report: &RunReport) {
    let stats = &report.stats;
    let now = Utc::now();

    println!();
    println!("News Radar run {}", stats.run_id);
    println!(
        "  sources: {} processed, {} failed",
        report.sources_processed, report.sources_failed
    );
    println!("  fetched:        {}", stats.total_fetched);
    println!("  after time:     {}", stats.after_time);
    println!("  after topic:    {}", stats.after_topic);
    println!("  after dedup:    {}", stats.after_duplicate);
    for (name, count) in &stats.custom {
        println!("  after {}: {}", name, count);
    }
    println!("  kept:           {} ({} from cache)", stats.total_kept, stats.cached);
    println!("  took:           {}ms", report.duration_ms);

    if report.articles.is_empty() {
        return;
    }

    println!();
    println!("Top articles:");
    for (index, article) in report.articles.iter().take(10).enumerate() {
        let age = article
            .published_at
            .map(|date| time_ago(date, now))
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "  {:>2}. [{:.1}] {} ({}, {})",
            index + 1,
            article.ai_score.unwrap_or_default(),
            truncate(&article.title, 80, "..."),
            article.source,
            age
        );
    }
}
