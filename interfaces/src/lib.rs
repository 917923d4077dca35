pub mod defs;

pub use defs::{Article, ArticleFilter, SourceKind, SourceSpec};
