//! Authentication infrastructure module
//!
//! Access tokens are HS256 JWTs carrying the username.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtService};
