//! Short-TTL result memoization keyed by request fingerprint.
//!
//! The cache is the only shared mutable state in the engine. It shields the
//! upstream catalog from repeated identical lookups; fingerprints are drawn
//! from a small key space (catalog identifiers plus date windows), so there
//! is no eviction beyond TTL expiry.
//!
//! There is no single-flight guarantee: concurrent misses on the same key
//! may each run the compute closure, and the last writer wins. Compute
//! errors propagate to the caller and are never cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;

/// Time source for cache expiry, injectable so tests control time.
pub trait Clock: Send + Sync {
    /// Current time as a duration since an arbitrary fixed epoch.
    fn now(&self) -> Duration;
}

/// Wall-clock time source used outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

/// TTL-expiring memoization map.
pub struct TtlCache<V> {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, (Duration, V)>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if it is younger than `ttl`,
    /// otherwise run `compute`, store its result with a fresh timestamp,
    /// and return it.
    ///
    /// # Errors
    ///
    /// Propagates the error from `compute`; nothing is cached on failure.
    pub fn get_or_compute<F>(&self, key: &str, ttl: Duration, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let now = self.clock.now();

        {
            let entries = self.entries.lock().expect("cache mutex poisoned");
            if let Some((stored_at, value)) = entries.get(key) {
                if now.saturating_sub(*stored_at) < ttl {
                    return Ok(value.clone());
                }
            }
        }

        let value = compute()?;

        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(key.to_string(), (now, value.clone()));
        Ok(value)
    }

    /// Number of entries currently stored, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    /// Whether the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Advanceable clock for deterministic expiry tests.
    struct ManualClock {
        now: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Duration::from_secs(1_000)),
            })
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            *self.now.lock().unwrap()
        }
    }

    #[test]
    fn second_read_within_ttl_skips_compute() {
        let clock = ManualClock::new();
        let cache: TtlCache<String> = TtlCache::with_clock(clock.clone());
        let calls = AtomicUsize::new(0);

        let fetch = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("value".to_string())
        };

        let first = cache
            .get_or_compute("physics:2099942", Duration::from_secs(300), fetch)
            .unwrap();
        clock.advance(Duration::from_secs(299));
        let second = cache
            .get_or_compute("physics:2099942", Duration::from_secs(300), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("other".to_string())
            })
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expired_entry_is_recomputed_with_fresh_timestamp() {
        let clock = ManualClock::new();
        let cache: TtlCache<u64> = TtlCache::with_clock(clock.clone());
        let calls = AtomicUsize::new(0);

        let fetch = |value: u64| {
            let calls = &calls;
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            }
        };

        cache
            .get_or_compute("key", Duration::from_secs(60), fetch(1))
            .unwrap();
        clock.advance(Duration::from_secs(60));
        let recomputed = cache
            .get_or_compute("key", Duration::from_secs(60), fetch(2))
            .unwrap();
        assert_eq!(recomputed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Timestamp was refreshed by the recompute, so the new value is
        // served until its own TTL elapses.
        clock.advance(Duration::from_secs(59));
        let cached = cache
            .get_or_compute("key", Duration::from_secs(60), fetch(3))
            .unwrap();
        assert_eq!(cached, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn compute_error_is_not_cached() {
        let clock = ManualClock::new();
        let cache: TtlCache<u64> = TtlCache::with_clock(clock);
        let calls = AtomicUsize::new(0);

        let result = cache.get_or_compute("key", Duration::from_secs(60), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(crate::error::Error::UpstreamUnavailable {
                message: "timeout".to_string(),
            })
        });
        assert!(result.is_err());
        assert!(cache.is_empty());

        let value = cache
            .get_or_compute("key", Duration::from_secs(60), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn keys_are_independent() {
        let clock = ManualClock::new();
        let cache: TtlCache<&'static str> = TtlCache::with_clock(clock);

        cache
            .get_or_compute("a", Duration::from_secs(60), || Ok("alpha"))
            .unwrap();
        cache
            .get_or_compute("b", Duration::from_secs(60), || Ok("beta"))
            .unwrap();

        assert_eq!(cache.len(), 2);
        let a = cache
            .get_or_compute("a", Duration::from_secs(60), || Ok("changed"))
            .unwrap();
        assert_eq!(a, "alpha");
    }
}
