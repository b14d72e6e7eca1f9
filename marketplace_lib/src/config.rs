//! Runtime configuration for the query coordinator, read from the environment.

use std::time::Duration;

pub const DEFAULT_LANGUAGE: &str = "fr";
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Defaults a [`crate::PagedFilterQuery`] starts from and returns to on reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    pub default_language: String,
    pub default_limit: u32,
    /// Quiescence interval applied to the search term.
    pub debounce: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            default_limit: DEFAULT_LIMIT,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl QueryConfig {
    /// Reads `MARKETPLACE_LANGUAGE`, `MARKETPLACE_PAGE_SIZE` and
    /// `MARKETPLACE_DEBOUNCE_MS`. Missing, unparsable or zero page sizes fall
    /// back to the defaults.
    pub fn from_env() -> Self {
        let default_language = std::env::var("MARKETPLACE_LANGUAGE")
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let default_limit = match env_u64("MARKETPLACE_PAGE_SIZE", DEFAULT_LIMIT as u64) {
            0 => DEFAULT_LIMIT,
            n => u32::try_from(n).unwrap_or(DEFAULT_LIMIT),
        };
        let debounce = Duration::from_millis(env_u64(
            "MARKETPLACE_DEBOUNCE_MS",
            DEFAULT_DEBOUNCE.as_millis() as u64,
        ));
        Self {
            default_language,
            default_limit,
            debounce,
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.default_language = language.to_string();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

pub(crate) fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<usize>().ok())
        .unwrap_or(default)
}
