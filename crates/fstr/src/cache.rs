//! Parsed-template cache keyed by the exact format string.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::parse::{parse, Template};

struct CacheEntry {
    template: Arc<Template>,
    last_used: AtomicU64,
}

/// A bounded map from format strings to parsed templates.
///
/// Hits only take the read lock; the recency tick is an atomic. Two threads
/// missing on the same format both parse it and the later insert wins. When
/// the entry count goes over capacity, the least recently used half is
/// dropped. A capacity of zero disables caching.
pub struct ParseCache {
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: AtomicU64,
}

impl ParseCache {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
        }
    }

    /// Returns the cached template for `format`, parsing it on a miss.
    pub fn get_or_parse(&self, format: &str) -> Arc<Template> {
        if self.capacity == 0 {
            return Arc::new(parse(format));
        }

        let now = self.clock.fetch_add(1, Ordering::Relaxed);
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(format) {
                entry.last_used.store(now, Ordering::Relaxed);
                return Arc::clone(&entry.template);
            }
        }

        let template = Arc::new(parse(format));
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            format.to_string(),
            CacheEntry {
                template: Arc::clone(&template),
                last_used: AtomicU64::new(now),
            },
        );
        if entries.len() > self.capacity {
            evict(&mut entries, self.capacity);
        }
        template
    }

    /// Returns `true` if `format` currently has a cached template.
    pub fn contains(&self, format: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(format)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every cached template.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for ParseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

/// Keeps the most recently used half of the capacity (at least one entry).
fn evict(entries: &mut HashMap<String, CacheEntry>, capacity: usize) {
    let keep = (capacity / 2).max(1);
    let mut ticks: Vec<u64> = entries
        .values()
        .map(|entry| entry.last_used.load(Ordering::Relaxed))
        .collect();
    ticks.sort_unstable_by(|a, b| b.cmp(a));

    if let Some(&cutoff) = ticks.get(keep - 1) {
        let before = entries.len();
        entries.retain(|_, entry| entry.last_used.load(Ordering::Relaxed) >= cutoff);
        tracing::debug!(
            evicted = before - entries.len(),
            remaining = entries.len(),
            "parse cache over capacity"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_template() {
        let cache = ParseCache::new(10);
        let first = cache.get_or_parse("Hello {}");
        let second = cache.get_or_parse("Hello {}");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_formats_are_distinct_entries() {
        let cache = ParseCache::new(10);
        cache.get_or_parse("{a}");
        cache.get_or_parse("{b}");
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("{a}"));
        assert!(!cache.contains("{c}"));
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = ParseCache::new(0);
        let first = cache.get_or_parse("{}");
        let second = cache.get_or_parse("{}");
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_keeps_recent_half() {
        let cache = ParseCache::new(4);
        for i in 0..4 {
            cache.get_or_parse(&format!("{{{}}}", i));
        }
        // touch the oldest so it survives
        cache.get_or_parse("{0}");
        cache.get_or_parse("{4}");

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("{0}"));
        assert!(cache.contains("{4}"));
        assert!(!cache.contains("{1}"));
    }

    #[test]
    fn test_capacity_one() {
        let cache = ParseCache::new(1);
        cache.get_or_parse("{a}");
        cache.get_or_parse("{b}");
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("{b}"));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let cache = ParseCache::new(8);
        for i in 0..100 {
            cache.get_or_parse(&format!("{{{}}}", i));
            assert!(cache.len() <= 8);
        }
    }

    #[test]
    fn test_clear() {
        let cache = ParseCache::default();
        cache.get_or_parse("{}");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), ParseCache::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ParseCache::new(16));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let format = format!("{{{}}} {}", i % 32, t % 2);
                        let template = cache.get_or_parse(&format);
                        assert_eq!(template.placeholders().len(), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 16);
    }
}
