#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use news_radar::Article;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .try_init();
    });
}

/// Fixed clock shared by the time-sensitive tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    now() - Duration::hours(hours)
}

pub fn article(title: &str, source: &str) -> Article {
    Article::new(title, source)
}

pub fn dated(title: &str, source: &str, url: &str, published_at: DateTime<Utc>) -> Article {
    Article::new(title, source)
        .with_url(url)
        .with_published_at(published_at)
}
