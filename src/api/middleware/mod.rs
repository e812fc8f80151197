//! API middleware and request extractors

pub mod logging;
pub mod reset_key;
pub mod security;
pub mod user_auth;

pub use logging::logging_middleware;
pub use reset_key::ResetKey;
pub use security::{security_headers_middleware, MAX_BODY_SIZE};
pub use user_auth::{extract_bearer_token, BearerToken, RequireAdmin, RequireUser};
