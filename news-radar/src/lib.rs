pub mod types;
pub mod config;
pub mod dates;
pub mod filters;
pub mod pipeline;
pub mod fetcher;
pub mod traits;
pub mod sources;
pub mod cache;
pub mod storage;
pub mod aggregator;
pub mod utils;

pub use types::*;
pub use config::{
    DuplicateConfig, FilterConfig, KeywordConfig, RadarConfig, TimeFilterConfig, TopicFilterConfig,
    MAX_WINDOW_HOURS,
};
pub use filters::{DuplicateFilter, MergePreference, TimeFilter, TopicFilter};
pub use dates::WithPublishedStr;
pub use pipeline::Pipeline;
pub use fetcher::Fetcher;
pub use traits::SourceParser;
pub use sources::{HtmlParser, OpmlFeed, OpmlParser, RssParser};
pub use cache::CacheHandle;
pub use storage::{CsvStorage, JsonStorage};
pub use aggregator::NewsRadar;
