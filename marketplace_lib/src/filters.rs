//! Filter state owned by a [`crate::PagedFilterQuery`] and the request
//! parameters derived from it.

use marketplace_api::{CategoryQuery, Query};
use serde::Serialize;

use crate::config::QueryConfig;
use crate::error::QueryError;

/// What the user is currently asking for.
///
/// Changing anything that alters the result set (`language`, `limit`,
/// `search_term`) moves back to page 1; changing `page` touches nothing else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub language: String,
    pub limit: u32,
    pub search_term: String,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::from_config(&QueryConfig::default())
    }
}

impl FilterState {
    pub fn from_config(config: &QueryConfig) -> Self {
        Self {
            language: config.default_language.clone(),
            limit: config.default_limit.max(1),
            search_term: String::new(),
            page: 1,
        }
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
        self.page = 1;
    }

    /// Rejects a zero page size, leaving the state untouched.
    pub fn set_limit(&mut self, limit: u32) -> Result<(), QueryError> {
        if limit == 0 {
            return Err(QueryError::Validation(
                "limit must be greater than 0".to_string(),
            ));
        }
        self.limit = limit;
        self.page = 1;
        Ok(())
    }

    /// Stores the term verbatim; trimming is left to the consumers.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.page = 1;
    }

    /// Rejects page 0. Upper bounds are checked by the owner, which knows the page count.
    pub fn set_page(&mut self, page: u32) -> Result<(), QueryError> {
        if page == 0 {
            return Err(QueryError::Validation(
                "page numbers start at 1".to_string(),
            ));
        }
        self.page = page;
        Ok(())
    }
}

/// Parameters of one page request, compared structurally to decide whether
/// a new request is needed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct QueryParams {
    pub language: String,
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl QueryParams {
    /// Combines the filters with the debounced search term. An empty term
    /// means no search at all.
    pub fn derive(filters: &FilterState, debounced_search: &str) -> Self {
        Self {
            language: filters.language.clone(),
            page: filters.page,
            limit: filters.limit,
            search: if debounced_search.is_empty() {
                None
            } else {
                Some(debounced_search.to_string())
            },
        }
    }

    /// The backend query these parameters translate to.
    pub fn to_category_query(&self) -> CategoryQuery {
        let query = CategoryQuery::default()
            .with_language(&self.language)
            .with_page(self.page)
            .with_limit(self.limit);
        match &self.search {
            Some(search) => query.with_search(search),
            None => query,
        }
    }
}
