use reqwest::blocking::Client;
use reqwest::header;

use crate::cache::PageCache;
use crate::config;
use crate::errors::SkycastResult;

/// What providers consume: a "fetch text for this URL" capability. The
/// production implementation is [`Fetcher`]; tests mock this seam.
#[cfg_attr(test, mockall::automock)]
pub trait PageSource: Send + Sync {
    fn page(&self, url: &str) -> SkycastResult<String>;
}

/// Raw network transport, separated from the caching policy so tests can
/// count actual calls.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> SkycastResult<Vec<u8>>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> SkycastResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, config::USER_AGENT)
            .send()?
            .error_for_status()?;

        Ok(response.bytes()?.to_vec())
    }
}

/// Cache-consulting page fetcher. A fresh cache entry short-circuits the
/// network; otherwise the body is fetched, stored, and returned decoded.
pub struct Fetcher<T: Transport> {
    transport: T,
    cache: PageCache,
    bypass_cache: bool,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, cache: PageCache, bypass_cache: bool) -> Self {
        Self {
            transport,
            cache,
            bypass_cache,
        }
    }
}

impl<T: Transport> PageSource for Fetcher<T> {
    fn page(&self, url: &str) -> SkycastResult<String> {
        if !self.bypass_cache {
            if let Some(bytes) = self.cache.get(url) {
                return Ok(String::from_utf8(bytes)?);
            }
        }

        log::info!("fetching {url}");
        let bytes = self.transport.get(url)?;
        self.cache.put(url, &bytes)?;

        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    struct CountingTransport {
        calls: Arc<AtomicUsize>,
        body: Vec<u8>,
    }

    impl Transport for CountingTransport {
        fn get(&self, _url: &str) -> SkycastResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    fn fetcher_in(
        dir: &TempDir,
        ttl: Duration,
        bypass_cache: bool,
        body: &[u8],
    ) -> (Fetcher<CountingTransport>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = CountingTransport {
            calls: calls.clone(),
            body: body.to_vec(),
        };
        let cache = PageCache::new(dir.path().to_path_buf(), ttl);
        (Fetcher::new(transport, cache, bypass_cache), calls)
    }

    #[test]
    fn test_first_fetch_hits_network_once_then_cache() {
        let dir = TempDir::new().unwrap();
        let (fetcher, calls) = fetcher_in(&dir, Duration::from_secs(300), false, b"A");

        assert_eq!(fetcher.page("http://x").unwrap(), "A");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Second fetch within the TTL window: zero additional network calls
        assert_eq!(fetcher.page("http://x").unwrap(), "A");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_expired_entry_refetches_and_refreshes() {
        let dir = TempDir::new().unwrap();
        let (fetcher, calls) = fetcher_in(&dir, Duration::ZERO, false, b"A");

        fetcher.page("http://x").unwrap();
        fetcher.page("http://x").unwrap();

        // Zero TTL means every entry is stale, so both fetches hit the network
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_bypass_forces_network_and_updates_cache() {
        let dir = TempDir::new().unwrap();
        let (fetcher, calls) = fetcher_in(&dir, Duration::from_secs(300), true, b"B");

        fetcher.page("http://x").unwrap();
        fetcher.page("http://x").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The bypassing fetcher still wrote through; a caching one reads it back
        let (cached_fetcher, cached_calls) =
            fetcher_in(&dir, Duration::from_secs(300), false, b"unused");
        assert_eq!(cached_fetcher.page("http://x").unwrap(), "B");
        assert_eq!(cached_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_utf8_body_is_a_fetch_error() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _calls) = fetcher_in(&dir, Duration::from_secs(300), false, &[0xff, 0xfe]);

        assert!(fetcher.page("http://x").is_err());
    }
}
