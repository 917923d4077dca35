pub mod duplicate;
pub mod time;
pub mod topic;

pub use duplicate::{content_hash, normalize_url, title_similarity, DuplicateFilter, MergePreference};
pub use time::TimeFilter;
pub use topic::{TopicFilter, ALIAS_WEIGHT, PRIMARY_WEIGHT, SECONDARY_WEIGHT};
