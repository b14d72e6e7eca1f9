use url::Url;

use super::{common::QueryCommon, Query};

/// Paginated category listing, optionally narrowed by a server-side search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CategoryQuery {
    pub common: QueryCommon,
    pub search: Option<String>,
}

impl Query for CategoryQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(search) = &self.search {
            url.query_pairs_mut().append_pair("search", search.as_str());
        };
        url
    }
}

impl CategoryQuery {
    /// Sets the search term. An empty term clears the filter so the backend
    /// never receives `search=`.
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = if search.is_empty() {
            None
        } else {
            Some(search.to_string())
        };
        self
    }
}

/// Category tree request (`hierarchy=true`). Pagination is not sent.
#[derive(Clone, Debug, Default)]
pub struct HierarchyQuery {
    pub common: QueryCommon,
}

impl HierarchyQuery {
    pub fn new(language: &str) -> Self {
        Self::default().with_language(language)
    }
}

impl Query for HierarchyQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("hierarchy", "true")
            .append_pair("language", &self.common.language);
        url
    }
}
