//! Error types for the library layer.

use std::fmt;

/// Failure reported by a [`crate::PageFetcher`].
///
/// Stored in the query result as data; never propagated across the
/// [`crate::PagedFilterQuery`] boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure: connection refused, timeout, DNS.
    #[error("Network error: {0}")]
    Network(String),
    /// The backend answered, but not with a usable page.
    #[error("Server error{}: {message}", status_suffix(.status))]
    Server {
        status: Option<u16>,
        message: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" ({})", status),
        None => String::new(),
    }
}

impl FetchError {
    /// Whether repeating the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Server { status, .. } => matches!(status, Some(s) if *s == 429 || *s >= 500),
        }
    }
}

impl From<marketplace_api::Error> for FetchError {
    fn from(e: marketplace_api::Error) -> Self {
        match e {
            marketplace_api::Error::RequestFailed => Self::Network(e.to_string()),
            marketplace_api::Error::HttpStatus { status, body } => Self::Server {
                status: Some(status),
                message: body,
            },
            marketplace_api::Error::InvalidBody => Self::Server {
                status: None,
                message: e.to_string(),
            },
        }
    }
}

/// Errors produced by the library layer's public operations.
#[derive(Debug)]
pub enum QueryError {
    /// A caller-supplied value was rejected (zero limit, page out of range).
    Validation(String),
    /// A direct fetch (outside the query coordinator) failed.
    Fetch(FetchError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Invalid input: {}", msg),
            Self::Fetch(e) => write!(f, "Fetch error: {}", e),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<FetchError> for QueryError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<marketplace_api::Error> for QueryError {
    fn from(e: marketplace_api::Error) -> Self {
        Self::Fetch(e.into())
    }
}
