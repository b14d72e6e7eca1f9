//! Caching and retrying wrapper around the API client.

use std::time::Duration;

use async_trait::async_trait;
use marketplace_api::types::{Category, Response};
use marketplace_api::Client;
use rand::Rng;

use crate::cache::PageCache;
use crate::config::{env_u64, env_usize};
use crate::error::{FetchError, QueryError};
use crate::fetch::{Page, PageFetcher};
use crate::filters::QueryParams;

/// Exponential backoff for transient fetch failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_millis(4000),
        }
    }
}

impl RetryPolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("MARKETPLACE_RETRY_MAX", defaults.max_retries),
            base_delay: Duration::from_millis(env_u64(
                "MARKETPLACE_RETRY_BASE_MS",
                defaults.base_delay.as_millis() as u64,
            )),
            max_delay: Duration::from_millis(env_u64(
                "MARKETPLACE_RETRY_MAX_MS",
                defaults.max_delay.as_millis() as u64,
            )),
        }
    }

    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = (self.base_delay.as_millis() as u64)
            .saturating_mul(exp)
            .min(self.max_delay.as_millis() as u64);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// API client wrapper that adds in-memory caching and retries.
///
/// Cache hits bypass the network entirely, so revisiting a page the user has
/// already seen is served instantly. Only successful pages are cached.
pub struct CachedClient {
    inner: Client,
    cache: PageCache<Category>,
    retry: RetryPolicy,
}

impl CachedClient {
    /// Creates a new cached client against the default gateway, retrying per the environment.
    pub fn new(cache: PageCache<Category>) -> Self {
        Self::with_client(Client::new(), cache)
    }

    /// Creates a new cached client with a custom base URL.
    pub fn with_base_url(base_url: &str, cache: PageCache<Category>) -> Self {
        Self::with_client(Client::with_base_url(base_url), cache)
    }

    fn with_client(inner: Client, cache: PageCache<Category>) -> Self {
        Self {
            inner,
            cache,
            retry: RetryPolicy::from_env(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !err.is_transient() {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64(),
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Fetches one page of categories, returning cached results when available.
    pub async fn get_categories(&self, params: &QueryParams) -> Result<Page<Category>, FetchError> {
        if let Some(page) = self.cache.get(params) {
            tracing::debug!(?params, "page cache hit");
            return Ok(page);
        }

        let query = params.to_category_query();
        let page = self
            .with_retry("categories", || async {
                Ok(Page::from(self.inner.get_categories(&query).await?))
            })
            .await?;
        self.cache.insert(params.clone(), page.clone());
        Ok(page)
    }

    /// Fetches a single category by ID. Not cached.
    pub async fn get_category(&self, category_id: i64) -> Result<Response<Category>, QueryError> {
        let resp = self
            .with_retry("category", || async {
                Ok(self.inner.get_category(category_id).await?)
            })
            .await?;
        Ok(resp)
    }

    /// Fetches the category tree for a language. Not cached.
    pub async fn get_category_hierarchy(
        &self,
        language: &str,
    ) -> Result<Vec<Category>, QueryError> {
        let resp = self
            .with_retry("hierarchy", || async {
                Ok(self.inner.get_category_hierarchy(language).await?)
            })
            .await?;
        Ok(resp.data)
    }

    /// Removes all entries from the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl PageFetcher for CachedClient {
    type Item = Category;

    async fn fetch_page(&self, params: &QueryParams) -> Result<Page<Category>, FetchError> {
        self.get_categories(params).await
    }

    fn invalidate(&self, params: &QueryParams) {
        if self.cache.remove(params).is_some() {
            tracing::debug!(?params, "dropped cached page");
        }
    }
}
