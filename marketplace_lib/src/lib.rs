//! Library layer for the marketplace storefront: a paginated, debounced,
//! filterable collection query over the marketplace REST backend.
//!
//! Wraps the `marketplace_api` crate with a TTL cache and retrying fetcher,
//! and provides the [`PagedFilterQuery`] coordinator that turns filter
//! mutations into at most one in-order page request per settled state.

pub mod cache;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod filters;
pub mod paged_query;
pub mod pagination;
pub mod search;

pub use marketplace_api;
pub use marketplace_api::types;
pub use marketplace_api::{CategoryQuery, Query};

pub use client::{CachedClient, RetryPolicy};
pub use config::QueryConfig;
pub use debounce::{DebounceTimer, SearchDebounce};
pub use error::{FetchError, QueryError};
pub use fetch::{Page, PageFetcher};
pub use filters::{FilterState, QueryParams};
pub use paged_query::{PagedFilterQuery, QueryEvent, QueryResult, QuerySnapshot};
pub use pagination::{item_range, page_window, PageLink};
pub use search::{sanitize_search, search_categories, Searchable, TextFilter};
