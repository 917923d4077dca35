use crate::types::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::{debug, info, warn};

/// File-backed TTL cache for raw source payloads.
///
/// Entries live one per file under `dir`, named by the SHA-256 of the key.
/// Freshness is judged from the file's modification time.
#[derive(Debug, Clone)]
pub struct CacheHandle {
    dir: PathBuf,
    ttl: Duration,
}

impl CacheHandle {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn from_hours(dir: impl Into<PathBuf>, ttl_hours: i64) -> Self {
        let hours = ttl_hours.max(0) as u64;
        Self::new(dir, Duration::from_secs(hours.saturating_mul(3600)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached value for `key`, or `None` when absent, expired or unreadable.
    pub async fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        let metadata = fs::metadata(&path).await.ok()?;
        let modified = metadata.modified().ok()?;

        if self.is_expired(modified) {
            debug!("Cache entry expired for {}", key);
            return None;
        }

        match fs::read_to_string(&path).await {
            Ok(value) => {
                debug!("Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                warn!("Unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), value).await?;
        debug!("Cached {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Remove every entry. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize> {
        self.remove_where(|_| true).await
    }

    /// Remove entries older than the TTL. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> Result<usize> {
        self.remove_where(|modified| self.is_expired(modified)).await
    }

    async fn remove_where<F>(&self, should_remove: F) -> Result<usize>
    where
        F: Fn(SystemTime) -> bool,
    {
        if !fs::try_exists(&self.dir).await? {
            return Ok(0);
        }

        let mut removed = 0;
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("cache") {
                continue;
            }
            let modified = entry.metadata().await?.modified()?;
            if should_remove(modified) {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Removed {} cache entries from {}", removed, self.dir.display());
        }
        Ok(removed)
    }

    fn is_expired(&self, modified: SystemTime) -> bool {
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        age > self.ttl
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.dir.join(format!("{:x}.cache", hasher.finalize()))
    }
}
