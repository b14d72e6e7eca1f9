//! Page cache keyed by the structural request parameters.
//!
//! Two requests with equal [`QueryParams`] hit the same entry, so flipping
//! back to a page already seen costs no network round trip. Entries live for
//! a fixed TTL; when the cache is full the entry closest to expiry is evicted.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::fetch::Page;
use crate::filters::QueryParams;

const DEFAULT_CAPACITY: usize = 256;

struct CachedPage<T> {
    page: Page<T>,
    expires_at: Instant,
}

pub struct PageCache<T> {
    pages: DashMap<QueryParams, CachedPage<T>>,
    ttl: Duration,
    capacity: usize,
}

impl<T: Clone> PageCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            pages: DashMap::new(),
            ttl,
            capacity,
        }
    }

    /// A cache that never retains anything.
    pub fn disabled() -> Self {
        Self::with_capacity(Duration::ZERO, 0)
    }

    /// Returns a copy of the cached page, evicting it if it has expired.
    pub fn get(&self, params: &QueryParams) -> Option<Page<T>> {
        let now = Instant::now();
        let entry = self.pages.get(params)?;
        if now >= entry.expires_at {
            drop(entry);
            self.pages.remove(params);
            return None;
        }
        Some(entry.page.clone())
    }

    pub fn insert(&self, params: QueryParams, page: Page<T>) {
        if self.ttl.is_zero() || self.capacity == 0 {
            return;
        }
        let now = Instant::now();
        if self.pages.len() >= self.capacity && !self.pages.contains_key(&params) {
            self.pages.retain(|_, cached| cached.expires_at > now);
            if self.pages.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        self.pages.insert(
            params,
            CachedPage {
                page,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn remove(&self, params: &QueryParams) -> Option<Page<T>> {
        self.pages.remove(params).map(|(_, cached)| cached.page)
    }

    fn evict_oldest(&self) {
        let oldest = self
            .pages
            .iter()
            .min_by_key(|entry| entry.expires_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.pages.remove(&key);
        }
    }

    /// Number of entries held, expired ones included.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn clear(&self) {
        self.pages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: u32, search: Option<&str>) -> QueryParams {
        QueryParams {
            language: "fr".to_string(),
            page,
            limit: 10,
            search: search.map(str::to_string),
        }
    }

    fn page(names: &[&str]) -> Page<String> {
        Page {
            items: names.iter().map(|n| n.to_string()).collect(),
            total_count: names.len() as u64,
            total_pages: 1,
            has_search: false,
        }
    }

    #[test]
    fn equal_params_share_an_entry() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.insert(params(1, Some("alg")), page(&["Algèbre"]));
        assert_eq!(cache.get(&params(1, Some("alg"))), Some(page(&["Algèbre"])));
        assert_eq!(cache.get(&params(1, None)), None);
        assert_eq!(cache.get(&params(2, Some("alg"))), None);
    }

    #[test]
    fn expired_pages_are_evicted_on_read() {
        let cache = PageCache::new(Duration::from_millis(1));
        cache.insert(params(1, None), page(&["Livres"]));
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get(&params(1, None)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn disabled_cache_stores_nothing() {
        let cache = PageCache::disabled();
        cache.insert(params(1, None), page(&["Livres"]));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn full_cache_evicts_the_oldest_page() {
        let cache = PageCache::with_capacity(Duration::from_secs(60), 2);
        cache.insert(params(1, None), page(&["a"]));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(params(2, None), page(&["b"]));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(params(3, None), page(&["c"]));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&params(1, None)), None);
        assert!(cache.get(&params(2, None)).is_some());
        assert!(cache.get(&params(3, None)).is_some());
    }

    #[test]
    fn overwriting_a_key_does_not_evict() {
        let cache = PageCache::with_capacity(Duration::from_secs(60), 1);
        cache.insert(params(1, None), page(&["a"]));
        cache.insert(params(1, None), page(&["a2"]));
        assert_eq!(cache.get(&params(1, None)), Some(page(&["a2"])));
    }

    #[test]
    fn remove_drops_a_single_page() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.insert(params(1, None), page(&["a"]));
        cache.insert(params(2, None), page(&["b"]));
        assert_eq!(cache.remove(&params(1, None)), Some(page(&["a"])));
        assert_eq!(cache.remove(&params(1, None)), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.insert(params(1, None), page(&["a"]));
        cache.insert(params(2, None), page(&["b"]));
        cache.clear();
        assert!(cache.is_empty());
    }
}
