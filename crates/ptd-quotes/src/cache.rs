//! TTL price cache over any quote source.
//!
//! Interactive sessions re-render the summary and re-scan triggers far more
//! often than quotes change; the cache bounds upstream traffic to one fetch
//! per symbol per freshness window. Only successful prices are cached;
//! a failure is returned to the caller and retried on the next lookup.
//! Fundamentals are not cached (deep-dive lookups are rare and on-demand).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::source::{Fundamentals, QuoteError, QuoteSource};

/// Default freshness window for cached prices.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Caching wrapper; itself a [`QuoteSource`], so callers can layer it over
/// any provider without knowing it is there.
pub struct QuoteCache<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, (i64, Instant)>>,
}

impl<S: QuoteSource> QuoteCache<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached price; the next lookup per symbol hits the source.
    pub fn invalidate_all(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn fresh_price(&self, symbol: &str) -> Option<i64> {
        let entries = self.entries.lock().ok()?;
        let (price, fetched_at) = entries.get(symbol)?;
        if fetched_at.elapsed() < self.ttl {
            Some(*price)
        } else {
            None
        }
    }

    fn store(&self, symbol: &str, price: i64) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(symbol.to_string(), (price, Instant::now()));
        }
    }
}

#[async_trait::async_trait]
impl<S: QuoteSource> QuoteSource for QuoteCache<S> {
    fn source_name(&self) -> &'static str {
        self.inner.source_name()
    }

    async fn last_price(&self, symbol: &str) -> Result<i64, QuoteError> {
        if let Some(price) = self.fresh_price(symbol) {
            return Ok(price);
        }
        // The lock is never held across this await.
        let price = self.inner.last_price(symbol).await?;
        self.store(symbol, price);
        Ok(price)
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, QuoteError> {
        self.inner.fundamentals(symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait::async_trait]
    impl QuoteSource for CountingSource {
        fn source_name(&self) -> &'static str {
            "counting"
        }

        async fn last_price(&self, symbol: &str) -> Result<i64, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(QuoteError::Transport("down".to_string()))
            } else {
                Ok(100_000_000 + symbol.len() as i64)
            }
        }
    }

    #[tokio::test]
    async fn second_lookup_within_ttl_is_served_from_cache() {
        let cache = QuoteCache::new(CountingSource::new());
        let first = cache.last_price("TCS.NS").await.unwrap();
        let second = cache.last_price("TCS.NS").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_symbols_are_cached_independently() {
        let cache = QuoteCache::new(CountingSource::new());
        cache.last_price("TCS.NS").await.unwrap();
        cache.last_price("INFY.NS").await.unwrap();
        cache.last_price("TCS.NS").await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let cache = QuoteCache::with_ttl(CountingSource::new(), Duration::ZERO);
        cache.last_price("TCS.NS").await.unwrap();
        cache.last_price("TCS.NS").await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = QuoteCache::new(CountingSource::new());
        cache.inner.fail.store(true, Ordering::SeqCst);
        assert!(cache.last_price("TCS.NS").await.is_err());

        cache.inner.fail.store(false, Ordering::SeqCst);
        assert!(cache.last_price("TCS.NS").await.is_ok());
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_all_forces_a_refetch() {
        let cache = QuoteCache::new(CountingSource::new());
        cache.last_price("TCS.NS").await.unwrap();
        cache.invalidate_all();
        cache.last_price("TCS.NS").await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }
}
