//! Process-scoped content cache.
//!
//! Keys are hex SHA-256 digests of the cached content's source bytes.
//! The clock is injected so TTL behavior is testable; eviction is
//! TTL-plus-capacity with no cross-process consistency guarantee — a
//! miss simply recomputes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use sha2::{Digest, Sha256};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Clone)]
struct Entry {
    value: String,
    inserted_at: Instant,
}

pub struct ContentCache {
    entries: DashMap<String, Entry>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl ContentCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
            clock,
        }
    }

    /// Cache key for arbitrary content bytes.
    pub fn key_for(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if now.duration_since(entry.inserted_at) < self.ttl {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: String, value: String) {
        let now = self.clock.now();
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.evict_one(now);
        }
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries first; otherwise the oldest entry goes.
    fn evict_one(&self, now: Instant) {
        let mut expired: Vec<String> = Vec::new();
        let mut oldest: Option<(String, Instant)> = None;

        for entry in self.entries.iter() {
            if now.duration_since(entry.inserted_at) >= self.ttl {
                expired.push(entry.key().clone());
            }
            match &oldest {
                Some((_, at)) if *at <= entry.inserted_at => {}
                _ => oldest = Some((entry.key().clone(), entry.inserted_at)),
            }
        }

        if expired.is_empty() {
            if let Some((key, _)) = oldest {
                self.entries.remove(&key);
            }
        } else {
            for key in expired {
                self.entries.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Clock whose notion of "now" is advanced by hand.
    struct ManualClock {
        start: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.offset.lock().unwrap()
        }
    }

    #[test]
    fn identical_content_produces_identical_keys() {
        assert_eq!(ContentCache::key_for(b"abc"), ContentCache::key_for(b"abc"));
        assert_ne!(ContentCache::key_for(b"abc"), ContentCache::key_for(b"abd"));
    }

    #[test]
    fn hit_within_ttl_miss_after_expiry() {
        let clock = Arc::new(ManualClock::new());
        let cache = ContentCache::with_clock(Duration::from_secs(60), 16, clock.clone());

        cache.insert("k".to_string(), "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));

        clock.advance(Duration::from_secs(61));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_the_oldest_entry() {
        let clock = Arc::new(ManualClock::new());
        let cache = ContentCache::with_clock(Duration::from_secs(3600), 2, clock.clone());

        cache.insert("a".to_string(), "1".to_string());
        clock.advance(Duration::from_secs(1));
        cache.insert("b".to_string(), "2".to_string());
        clock.advance(Duration::from_secs(1));
        cache.insert("c".to_string(), "3".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("2".to_string()));
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }

    #[test]
    fn reinserting_an_existing_key_does_not_evict_others() {
        let cache = ContentCache::new(Duration::from_secs(3600), 2);
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        cache.insert("a".to_string(), "updated".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some("updated".to_string()));
        assert_eq!(cache.get("b"), Some("2".to_string()));
    }
}
