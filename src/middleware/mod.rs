pub mod auth;
pub mod error_handler;
pub mod response;

pub use auth::{require_auth, AuthUser};
pub use error_handler::{error_handler, not_found};
pub use response::{ApiResponse, ApiResult, Message};
