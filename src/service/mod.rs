pub mod http;
pub mod traits;
pub mod types;

pub use http::HttpListingService;
pub use traits::ListingService;
pub use types::{classify_failure, FailureKind, ServiceError, ServiceResult};
