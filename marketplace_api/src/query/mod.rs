mod common;
pub use self::common::{Query, QueryCommon};

mod category;
pub use self::category::{CategoryQuery, HierarchyQuery};
