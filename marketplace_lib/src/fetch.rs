//! The seam between the query coordinator and whatever serves pages.

use async_trait::async_trait;
use marketplace_api::types::{Category, PaginatedResponse};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::filters::QueryParams;

/// One page of results in backend-neutral form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u32,
    /// Whether the server applied the search parameter.
    pub has_search: bool,
}

impl<T> From<PaginatedResponse<T>> for Page<T> {
    fn from(resp: PaginatedResponse<T>) -> Self {
        Self {
            items: resp.data,
            total_count: resp.total_count,
            total_pages: resp.total_pages,
            has_search: resp.has_search,
        }
    }
}

/// Serves pages for a [`crate::PagedFilterQuery`].
///
/// Implementations are shared with spawned request tasks, hence `Send + Sync`.
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    type Item: Send + 'static;

    async fn fetch_page(&self, params: &QueryParams) -> Result<Page<Self::Item>, FetchError>;

    /// Forget anything remembered for `params` so the next fetch goes to the
    /// source. Fetchers without a cache have nothing to do.
    fn invalidate(&self, _params: &QueryParams) {}
}

#[async_trait]
impl PageFetcher for marketplace_api::Client {
    type Item = Category;

    async fn fetch_page(&self, params: &QueryParams) -> Result<Page<Category>, FetchError> {
        let resp = self.get_categories(&params.to_category_query()).await?;
        Ok(resp.into())
    }
}
