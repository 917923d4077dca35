use crate::config::DuplicateConfig;
use crate::types::{Article, ArticleFilter, RadarError, Result};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, info};
use url::Url;

/// Titles shorter than this (in characters) only ever match exactly.
pub const MIN_FUZZY_TITLE_CHARS: usize = 5;

/// Which member of a duplicate group survives `merge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePreference {
    Newest,
    Oldest,
    First,
}

impl FromStr for MergePreference {
    type Err = RadarError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "first" => Ok(Self::First),
            other => Err(RadarError::Config(format!(
                "unknown merge preference '{}', expected newest, oldest or first",
                other
            ))),
        }
    }
}

/// Identity keys of one article under the enabled methods.
struct IdentityKeys {
    url: Option<String>,
    title: Option<String>,
    hash: Option<String>,
}

/// Keys accumulated from retained articles while scanning.
#[derive(Default)]
struct SeenSet {
    urls: HashSet<String>,
    titles: HashSet<String>,
    fuzzy_titles: Vec<String>,
    hashes: HashSet<String>,
}

impl SeenSet {
    fn track(&mut self, keys: IdentityKeys) {
        if let Some(url) = keys.url {
            self.urls.insert(url);
        }
        if let Some(title) = keys.title {
            if title.chars().count() >= MIN_FUZZY_TITLE_CHARS {
                self.fuzzy_titles.push(title.clone());
            }
            self.titles.insert(title);
        }
        if let Some(hash) = keys.hash {
            self.hashes.insert(hash);
        }
    }

    fn absorb(&mut self, other: SeenSet) {
        self.urls.extend(other.urls);
        self.titles.extend(other.titles);
        self.fuzzy_titles.extend(other.fuzzy_titles);
        self.hashes.extend(other.hashes);
    }
}

/// Drops articles that repeat an earlier one by URL, title or content.
///
/// Methods are ORed: a match under any enabled method is a duplicate. In the
/// default remove mode the first article seen wins; `merge` collapses each
/// duplicate group to one representative instead.
#[derive(Debug, Clone)]
pub struct DuplicateFilter {
    options: DuplicateConfig,
}

impl DuplicateFilter {
    pub fn new(options: DuplicateConfig) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &DuplicateConfig {
        &self.options
    }

    pub fn filter(&self, articles: Vec<Article>) -> Vec<Article> {
        let total = articles.len();
        let mut seen = SeenSet::default();
        let mut kept = Vec::with_capacity(total);

        for article in articles {
            let keys = self.identity_keys(&article);
            if self.is_duplicate(&keys, &seen) {
                debug!("Removing duplicate article: '{}' ({:?})", article.title, article.url);
                continue;
            }
            seen.track(keys);
            kept.push(article);
        }

        info!(
            "Duplicate Filter: removed {} duplicates, kept {} unique articles",
            total - kept.len(),
            kept.len()
        );
        kept
    }

    /// Collapse duplicate groups to one article each.
    ///
    /// An article joins every earlier group it matches, folding them into
    /// one, so no two surviving articles are duplicates of each other. The
    /// surviving article is picked by `preference`, its empty fields are
    /// filled from the other members, and their sources are listed in
    /// `duplicate_sources`.
    pub fn merge(&self, articles: Vec<Article>, preference: MergePreference) -> Vec<Article> {
        let total = articles.len();
        let mut groups: Vec<(SeenSet, Vec<(usize, Article)>)> = Vec::new();

        for (position, article) in articles.into_iter().enumerate() {
            let keys = self.identity_keys(&article);
            let matching: Vec<usize> = groups
                .iter()
                .enumerate()
                .filter(|(_, (seen, _))| self.is_duplicate(&keys, seen))
                .map(|(index, _)| index)
                .collect();

            let target = match matching.split_first() {
                Some((&first, rest)) => {
                    // Highest index first so removals leave `first` in place.
                    for &index in rest.iter().rev() {
                        let (seen, members) = groups.remove(index);
                        debug!("Joining duplicate groups {} and {}", first, index);
                        groups[first].0.absorb(seen);
                        groups[first].1.extend(members);
                    }
                    first
                }
                None => {
                    groups.push((SeenSet::default(), Vec::new()));
                    groups.len() - 1
                }
            };

            let (seen, members) = &mut groups[target];
            seen.track(keys);
            members.push((position, article));
        }

        let merged: Vec<Article> = groups
            .into_iter()
            .map(|(_, mut members)| {
                members.sort_by_key(|(position, _)| *position);
                let members = members.into_iter().map(|(_, article)| article).collect();
                collapse_group(members, preference)
            })
            .collect();

        info!(
            "Merged {} articles into {} unique articles (removed {} duplicates)",
            total,
            merged.len(),
            total - merged.len()
        );
        merged
    }

    fn identity_keys(&self, article: &Article) -> IdentityKeys {
        let url = if self.options.by_url {
            article
                .url
                .as_deref()
                .map(|u| normalize_url(u, &self.options.tracking_params))
                .filter(|u| !u.is_empty())
        } else {
            None
        };

        let title = if self.options.by_title {
            Some(article.title.trim().to_lowercase()).filter(|t| !t.is_empty())
        } else {
            None
        };

        let hash = if self.options.by_content {
            Some(content_hash(article))
        } else {
            None
        };

        IdentityKeys { url, title, hash }
    }

    fn is_duplicate(&self, keys: &IdentityKeys, seen: &SeenSet) -> bool {
        if let Some(url) = &keys.url {
            if seen.urls.contains(url) {
                return true;
            }
        }

        if let Some(title) = &keys.title {
            if seen.titles.contains(title) {
                return true;
            }
            if self.options.fuzzy_titles && title.chars().count() >= MIN_FUZZY_TITLE_CHARS {
                let threshold = self.options.title_similarity_threshold;
                if seen
                    .fuzzy_titles
                    .iter()
                    .any(|other| title_similarity(title, other) >= threshold)
                {
                    return true;
                }
            }
        }

        if let Some(hash) = &keys.hash {
            if seen.hashes.contains(hash) {
                return true;
            }
        }

        false
    }
}

impl ArticleFilter for DuplicateFilter {
    fn name(&self) -> String {
        "duplicate".to_string()
    }

    fn apply(&self, articles: Vec<Article>) -> anyhow::Result<Vec<Article>> {
        Ok(self.filter(articles))
    }
}

fn collapse_group(mut members: Vec<Article>, preference: MergePreference) -> Article {
    let index = representative_index(&members, preference);
    let mut base = members.remove(index);

    let mut other_sources: Vec<String> = Vec::new();
    for other in &members {
        if base.description.is_empty() && !other.description.is_empty() {
            base.description = other.description.clone();
        }
        if base.tags.is_empty() && !other.tags.is_empty() {
            base.tags = other.tags.clone();
        }
        if base.author.is_none() {
            base.author = other.author.clone();
        }
        if base.image_url.is_none() {
            base.image_url = other.image_url.clone();
        }
        if other.source != base.source && !other_sources.contains(&other.source) {
            other_sources.push(other.source.clone());
        }
    }

    for source in other_sources {
        if !base.duplicate_sources.contains(&source) {
            base.duplicate_sources.push(source);
        }
    }
    base
}

fn representative_index(members: &[Article], preference: MergePreference) -> usize {
    let mut best = 0;
    for (index, candidate) in members.iter().enumerate().skip(1) {
        let current = members[best].published_at;
        // Missing dates always sort after present ones; ties keep the earlier.
        let better = match (candidate.published_at, current) {
            (Some(_), None) => preference != MergePreference::First,
            (Some(a), Some(b)) => match preference {
                MergePreference::Newest => a.cmp(&b) == Ordering::Greater,
                MergePreference::Oldest => a.cmp(&b) == Ordering::Less,
                MergePreference::First => false,
            },
            _ => false,
        };
        if better {
            best = index;
        }
    }
    best
}

/// Canonical form of a URL for identity comparison: lowercase scheme, host
/// and path, no fragment, no tracking parameters, no trailing slash.
pub fn normalize_url(raw: &str, tracking_params: &[String]) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => return trimmed.to_lowercase().trim_end_matches('/').to_string(),
    };

    url.set_fragment(None);

    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key, tracking_params))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            let mut serializer = url.query_pairs_mut();
            serializer.clear();
            serializer.extend_pairs(pairs.iter());
        }
    }

    let host = url.host_str().unwrap_or_default().to_lowercase();
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    let path = url.path().to_lowercase();
    let query = url.query().map(|q| format!("?{}", q)).unwrap_or_default();

    format!(
        "{}://{}{}{}{}",
        url.scheme().to_lowercase(),
        host,
        port,
        path.trim_end_matches('/'),
        query
    )
}

fn is_tracking_param(key: &str, tracking_params: &[String]) -> bool {
    let key = key.to_lowercase();
    tracking_params.iter().any(|param| {
        let param = param.to_lowercase();
        if param.ends_with('_') {
            key.starts_with(&param)
        } else {
            key == param
        }
    })
}

/// SHA-256 over title, description and source.
pub fn content_hash(article: &Article) -> String {
    let content = [
        article.title.as_str(),
        article.description.as_str(),
        article.source.as_str(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join("|");

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Normalized Levenshtein ratio in [0, 1] of two already case-folded titles.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}
