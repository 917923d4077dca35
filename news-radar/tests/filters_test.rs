mod common;

use chrono::Duration;
use common::{article, dated, hours_ago, now};
use news_radar::{
    Article, ArticleFilter, KeywordConfig, RadarError, TimeFilter, TimeFilterConfig, TopicFilter,
    TopicFilterConfig, MAX_WINDOW_HOURS,
};

fn time_filter(window_hours: i64) -> TimeFilter {
    TimeFilter::new(&TimeFilterConfig { window_hours }).unwrap()
}

fn topic_filter(min_score: f64) -> TopicFilter {
    TopicFilter::new(&KeywordConfig::default(), &TopicFilterConfig { min_score }).unwrap()
}

#[test]
fn time_filter_keeps_window_and_drops_stale() {
    common::init_tracing();
    let filter = time_filter(24);

    let articles = vec![
        dated("fresh", "a", "https://a.com/1", hours_ago(2)),
        dated("stale", "a", "https://a.com/2", hours_ago(30)),
        dated("edge", "a", "https://a.com/3", hours_ago(24)),
        dated("just outside", "a", "https://a.com/4", hours_ago(24) - Duration::seconds(1)),
    ];

    let kept = filter.filter_at(articles, now());
    let titles: Vec<&str> = kept.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["fresh", "edge"]);
}

#[test]
fn time_filter_drops_undated_and_keeps_future() {
    let filter = time_filter(24);

    let articles = vec![
        article("undated", "a"),
        dated("future", "a", "https://a.com/f", now() + Duration::hours(5)),
    ];

    let kept = filter.filter_at(articles, now());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title, "future");
}

#[test]
fn time_filter_rejects_out_of_range_window() {
    for window_hours in [0, -5, MAX_WINDOW_HOURS + 1, 10_000_000_000, i64::MAX] {
        let result = TimeFilter::new(&TimeFilterConfig { window_hours });
        assert!(matches!(result, Err(RadarError::Config(_))));
    }
}

#[test]
fn time_filter_preserves_order() {
    let filter = time_filter(48);
    let articles: Vec<Article> = (0..5)
        .map(|i| dated(&format!("item {}", i), "a", &format!("https://a.com/{}", i), hours_ago(i)))
        .collect();

    let kept = filter.filter_at(articles.clone(), now());
    assert_eq!(kept, articles);
}

#[test]
fn topic_scores_follow_tiers() {
    common::init_tracing();
    let filter = topic_filter(0.0);

    let primary = article("New Machine Learning Model Beats Benchmarks", "a");
    let secondary = article("OpenAI ships a new release", "a");
    let alias = article("Startup bets on AI for logistics", "a");
    let none = article("Local team wins the championship", "a");

    assert_eq!(filter.score(&primary), 1.0);
    assert_eq!(filter.score(&secondary), 0.7);
    assert_eq!(filter.score(&alias), 0.5);
    assert_eq!(filter.score(&none), 0.0);
}

#[test]
fn best_tier_wins_when_several_match() {
    let filter = topic_filter(0.0);
    let article = article("ChatGPT and AI: a deep learning primer", "a");
    assert_eq!(filter.score(&article), 1.0);
}

#[test]
fn keywords_match_whole_words_only() {
    let filter = topic_filter(0.0);

    for title in ["Brain scans explained", "He said it was fine", "Maintenance window tonight"] {
        assert_eq!(filter.score(&article(title, "a")), 0.0, "{}", title);
    }
    assert_eq!(filter.score(&article("The AI/ML hype cycle", "a")), 0.5);
    assert_eq!(filter.score(&article("(AI) news", "a")), 0.5);
}

#[test]
fn description_and_tags_count() {
    let filter = topic_filter(0.0);

    let by_description = article("Weekly roundup", "a")
        .with_description("A look at neural network pruning");
    let by_tag = article("Weekly roundup", "a").with_tags(["NLP"]);

    assert_eq!(filter.score(&by_description), 1.0);
    assert_eq!(filter.score(&by_tag), 0.5);
}

#[test]
fn empty_text_scores_zero() {
    let filter = topic_filter(0.0);
    assert_eq!(filter.score(&article("", "a")), 0.0);
}

#[test]
fn scores_are_in_the_tier_set_and_drive_retention() {
    let filter = topic_filter(0.5);
    let articles = vec![
        article("Large language model news", "a"),
        article("Anthropic publishes research", "a"),
        article("AI in farming", "a"),
        article("Gardening tips", "a"),
    ];

    for a in &articles {
        let score = filter.score(a);
        assert!([0.0, 0.5, 0.7, 1.0].contains(&score));
    }

    let kept = filter.filter(articles);
    let scores: Vec<f64> = kept.iter().map(|a| a.ai_score.unwrap()).collect();
    assert_eq!(scores, vec![1.0, 0.7, 0.5]);
}

#[test]
fn min_score_boundaries() {
    let articles = vec![article("AI in farming", "a"), article("Gardening tips", "a")];

    assert_eq!(topic_filter(0.0).filter(articles.clone()).len(), 2);
    assert_eq!(topic_filter(0.6).filter(articles.clone()).len(), 0);
    assert_eq!(topic_filter(0.5).filter(articles).len(), 1);
}

#[test]
fn scoring_is_idempotent() {
    let filter = topic_filter(0.5);
    let once = filter.filter(vec![article("Generative AI for video", "a")]);
    let twice = filter.filter(once.clone());

    assert_eq!(once, twice);
    assert_eq!(filter.score(&once[0]), filter.score(&twice[0]));
}

#[test]
fn rejects_min_score_outside_unit_interval() {
    for min_score in [-0.1, 1.5] {
        let result = TopicFilter::new(&KeywordConfig::default(), &TopicFilterConfig { min_score });
        assert!(matches!(result, Err(RadarError::Config(_))));
    }
}

#[test]
fn custom_vocabulary() {
    let keywords = KeywordConfig {
        primary: vec!["rust".to_string()],
        secondary: vec![],
        aliases: vec![],
    };
    let filter = TopicFilter::new(&keywords, &TopicFilterConfig { min_score: 0.5 }).unwrap();

    assert_eq!(filter.score(&article("Rust 2024 edition lands", "a")), 1.0);
    assert_eq!(filter.score(&article("AI everywhere", "a")), 0.0);
}

#[test]
fn matched_keywords_and_sorting() {
    let filter = topic_filter(0.0);

    let matched = filter.matched_keywords(&article("OpenAI and machine learning", "a"));
    assert_eq!(matched, vec!["machine learning".to_string(), "openai".to_string()]);

    let sorted = filter.sort_by_relevance(vec![
        article("AI in farming", "a"),
        article("Gardening tips", "a"),
        article("Deep learning for weather", "a"),
        article("AI in shipping", "a"),
    ]);
    let titles: Vec<&str> = sorted.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Deep learning for weather", "AI in farming", "AI in shipping", "Gardening tips"]
    );
}

#[test]
fn filters_report_names() {
    assert_eq!(time_filter(24).name(), "time");
    assert_eq!(topic_filter(0.5).name(), "topic");
}

#[test]
fn largest_window_filters_without_overflow() {
    let filter = time_filter(MAX_WINDOW_HOURS);
    let articles = vec![
        dated("ancient", "a", "https://a.com/old", now() - Duration::days(365 * 500)),
        article("undated", "a"),
    ];

    let kept = filter.filter_at(articles, now());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title, "ancient");
    assert!(filter.cutoff(now()) < now());
}
