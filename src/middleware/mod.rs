pub mod boundary;
pub mod response;

pub use boundary::{envelope_bare_errors, handle_panic, route_not_found};
pub use response::{ApiResponse, ApiResult};
