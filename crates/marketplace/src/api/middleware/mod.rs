//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{admin_only, auth_middleware, authorize, bearer_token, seller_or_admin, CurrentUser};
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware, RateLimitError};
