mod meta;
pub use self::meta::{PaginatedResponse, Response};

mod category;
pub use self::category::{AudienceGender, Category, CategoryID};
