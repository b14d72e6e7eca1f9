//! HTTP client for the marketplace REST backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{CategoryQuery, HierarchyQuery, Query},
    types::{Category, PaginatedResponse, Response},
    Error,
};

/// Default gateway of the marketplace backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// HTTP client for the marketplace REST backend.
///
/// Holds a single `reqwest::Client` with a 30-second timeout; cloning is cheap
/// since the underlying connection pool is shared.
#[derive(Clone)]
pub struct Client {
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    base_api_url: String,
    http: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the default local gateway.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for deployments and wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::InvalidBody
        })?;

        Ok(parsed)
    }

    /// Fetches one page of categories matching the given query.
    pub async fn get_categories(
        &self,
        query: &CategoryQuery,
    ) -> Result<PaginatedResponse<Category>, Error> {
        self.get::<PaginatedResponse<Category>, CategoryQuery>("/api/categories", Some(query))
            .await
    }

    /// Fetches a single category by its numeric ID.
    pub async fn get_category(&self, category_id: i64) -> Result<Response<Category>, Error> {
        self.get::<Response<Category>, CategoryQuery>(
            format!("/api/categories/{}", category_id).as_str(),
            None,
        )
        .await
    }

    /// Fetches the category tree (roots with nested `children`) for a language.
    pub async fn get_category_hierarchy(
        &self,
        language: &str,
    ) -> Result<Response<Vec<Category>>, Error> {
        let query = HierarchyQuery::new(language);
        self.get::<Response<Vec<Category>>, HierarchyQuery>("/api/categories", Some(&query))
            .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(1500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert!(out.len() <= 2000 + "...[truncated]".len());
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = Client::with_base_url("http://example.com/");
        assert_eq!(client.base_url(), "http://example.com");
    }
}
