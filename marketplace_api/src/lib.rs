mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, DEFAULT_BASE_URL};
pub use self::errors::Error;
pub use self::query::{CategoryQuery, HierarchyQuery, Query, QueryCommon};
