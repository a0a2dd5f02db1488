use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use md5::{Digest, Md5};

use crate::errors::SkycastResult;

/// Content-addressed page cache: one file per URL hash, raw response bytes,
/// file mtime as the freshness signal. Entries older than the TTL are
/// treated as absent and refreshed by overwrite, never mutated in place.
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
    ttl: Duration,
}

impl PageCache {
    pub fn new(dir: PathBuf, ttl: Duration) -> Self {
        Self { dir, ttl }
    }

    /// Stable key for a URL. Collisions are irrelevant at this scale.
    fn url_hash(url: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(url.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(Self::url_hash(url))
    }

    fn is_fresh(&self, path: &Path) -> bool {
        let Ok(metadata) = fs::metadata(path) else {
            return false;
        };
        let Ok(modified) = metadata.modified() else {
            return false;
        };

        match modified.elapsed() {
            Ok(age) => age < self.ttl,
            // Clock skew put the mtime in the future; treat as stale
            Err(_) => false,
        }
    }

    /// Cached bytes for a URL, or `None` when there is no entry or the
    /// entry has outlived the TTL.
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(url);
        if !self.is_fresh(&path) {
            return None;
        }

        match fs::read(&path) {
            Ok(bytes) => {
                log::debug!("cache hit for {url}");
                Some(bytes)
            }
            Err(_) => None,
        }
    }

    /// Store a page body, replacing any previous entry and refreshing its
    /// timestamp. The write goes through a temp file and a rename so a
    /// concurrent reader never observes a partial body.
    pub fn put(&self, url: &str, body: &[u8]) -> SkycastResult<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.entry_path(url);
        let tmp = path.with_extension("tmp");

        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;

        log::debug!("cached {} bytes for {url}", body.len());
        Ok(())
    }
}
