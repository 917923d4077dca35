mod common;

use common::{dated, hours_ago};
use news_radar::storage::StoredRun;
use news_radar::{Article, CacheHandle, CsvStorage, JsonStorage, RadarConfig, RadarError, RunStats, SourceKind};
use std::time::Duration;
use tempfile::TempDir;

fn sample() -> Vec<Article> {
    vec![
        dated("Deep learning on phones", "Lab", "https://lab.example.com/1", hours_ago(1))
            .with_tags(["mobile", "ml"])
            .with_author("Ada"),
        dated("Computer vision, in retail", "Retail", "https://r.example.com/2", hours_ago(2)),
    ]
}

#[test]
fn json_save_and_load() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let storage = JsonStorage::new(dir.path().join("out").join("news.json"));

    let mut stats = RunStats::new();
    stats.total_fetched = 7;
    stats.total_kept = 2;
    storage.save(&sample(), &stats).unwrap();

    let raw = std::fs::read_to_string(storage.path()).unwrap();
    let run: StoredRun = serde_json::from_str(&raw).unwrap();
    assert_eq!(run.version, "1.0");
    assert_eq!(run.count, 2);
    assert_eq!(run.stats.unwrap().total_fetched, 7);
    assert!(raw.contains("\"publishedAt\""));

    assert_eq!(storage.load().unwrap(), sample());
}

#[test]
fn json_save_keeps_a_backup() {
    let dir = TempDir::new().unwrap();
    let storage = JsonStorage::new(dir.path().join("news.json"));

    storage.save(&sample()[..1], &RunStats::new()).unwrap();
    storage.save(&sample(), &RunStats::new()).unwrap();

    let backup = JsonStorage::new(storage.backup_path());
    assert_eq!(backup.load().unwrap().len(), 1);
    assert_eq!(storage.load().unwrap().len(), 2);
}

#[test]
fn json_load_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let storage = JsonStorage::new(dir.path().join("missing.json"));
    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn json_load_corrupt_file_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("news.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = JsonStorage::new(path).load();
    assert!(matches!(result, Err(RadarError::Serialization(_))));
}

#[test]
fn csv_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("news.csv");
    CsvStorage::new(&path).save(&sample()).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "title");
    assert_eq!(&headers[5], "tags");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][5], "mobile;ml");
    assert_eq!(&rows[0][6], "Ada");
    assert_eq!(&rows[1][0], "Computer vision, in retail");
    assert!(rows[0][3].starts_with("2024-01-15T11:00:00"));
}

#[tokio::test]
async fn cache_round_trip() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let cache = CacheHandle::new(dir.path().join("cache"), Duration::from_secs(3600));

    assert_eq!(cache.get("https://feed.example.com/rss").await, None);
    cache.set("https://feed.example.com/rss", "<rss/>").await.unwrap();
    assert_eq!(
        cache.get("https://feed.example.com/rss").await.as_deref(),
        Some("<rss/>")
    );
    assert_eq!(cache.get("https://feed.example.com/other").await, None);
}

#[tokio::test]
async fn cache_expiry_and_cleanup() {
    let dir = TempDir::new().unwrap();
    let cache = CacheHandle::new(dir.path(), Duration::from_millis(50));

    cache.set("a", "1").await.unwrap();
    cache.set("b", "2").await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(cache.get("a").await, None);
    assert_eq!(cache.cleanup_expired().await.unwrap(), 2);
    assert_eq!(cache.cleanup_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn cache_clear() {
    let dir = TempDir::new().unwrap();
    let cache = CacheHandle::from_hours(dir.path().join("c"), 1);

    assert_eq!(cache.clear().await.unwrap(), 0);
    cache.set("a", "1").await.unwrap();
    cache.set("b", "2").await.unwrap();
    assert_eq!(cache.clear().await.unwrap(), 2);
    assert_eq!(cache.get("a").await, None);
}

#[test]
fn config_from_toml() {
    let config = RadarConfig::from_toml_str(
        r#"
        cache_ttl_hours = 2
        enable_cache = false

        [filters.time]
        window_hours = 48

        [filters.topic]
        min_score = 0.7

        [filters.keywords]
        primary = ["rust"]

        [filters.duplicate]
        by_content = true

        [[sources]]
        name = "AI Weekly"
        url = "https://aiweekly.example.com/rss"

        [[sources]]
        name = "Retail"
        url = "https://retail.example.com/"
        type = "html"
        selector = "article"
        "#,
    )
    .unwrap();

    assert_eq!(config.filters.time.window_hours, 48);
    assert_eq!(config.filters.topic.min_score, 0.7);
    assert_eq!(config.filters.keywords.primary, vec!["rust".to_string()]);
    assert!(!config.filters.keywords.aliases.is_empty());
    assert!(config.filters.duplicate.by_content);
    assert!(config.filters.duplicate.by_url);
    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.sources[0].kind, SourceKind::Rss);
    assert_eq!(config.sources[0].max_articles, 20);
    assert_eq!(config.sources[1].kind, SourceKind::Html);
    assert!(!config.enable_cache);
}

#[test]
fn config_rejects_invalid_values() {
    let bad_score = RadarConfig::from_toml_str("[filters.topic]\nmin_score = 3.0\n");
    assert!(matches!(bad_score, Err(RadarError::Config(_))));

    let not_toml = RadarConfig::from_toml_str("this is = = not toml");
    assert!(matches!(not_toml, Err(RadarError::Config(_))));

    let no_url = RadarConfig::from_toml_str("[[sources]]\nname = \"x\"\n");
    assert!(matches!(no_url, Err(RadarError::Config(_))));
}

#[test]
fn config_load_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = RadarConfig::load(&dir.path().join("radar.toml")).unwrap();
    assert_eq!(config.filters.time.window_hours, 24);
    assert!(config.sources.is_empty());
}

#[tokio::test]
async fn cache_accepts_huge_ttl() {
    let dir = TempDir::new().unwrap();
    let cache = CacheHandle::from_hours(dir.path(), i64::MAX);

    cache.set("k", "v").await.unwrap();
    assert_eq!(cache.get("k").await.as_deref(), Some("v"));
    assert_eq!(cache.cleanup_expired().await.unwrap(), 0);
}
