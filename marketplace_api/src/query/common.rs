//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] fields.

use url::Url;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for language and pagination.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the page number (1-indexed).
    fn with_page(mut self, page: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = page;
        self
    }

    /// Sets the number of results per page.
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = limit;
        self
    }

    /// Sets the language code the backend localizes names and descriptions into.
    fn with_language(mut self, language: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().language = language.to_string();
        self
    }
}

/// Fields shared by all paginated queries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryCommon {
    /// Language code, e.g. `fr` or `ar`. Defaults to `fr`.
    pub language: String,
    /// Page number (1-indexed). Defaults to 1.
    pub page: u32,
    /// Results per page. Defaults to 10.
    pub limit: u32,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            language: "fr".to_string(),
            page: 1,
            limit: 10,
        }
    }
}

impl QueryCommon {
    /// Appends the language and pagination parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("language", &self.language)
            .append_pair("page", &self.page.to_string())
            .append_pair("limit", &self.limit.to_string());
        url
    }
}
