use serde::{Deserialize, Serialize};

/// One page of a listing as returned by the backend.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Whether the backend applied the `search` parameter to this page.
    #[serde(default)]
    pub has_search: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Response<T> {
    pub data: T,
}
