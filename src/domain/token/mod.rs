//! Revoked access tokens

mod entity;
mod repository;

pub use entity::RevokedToken;
pub use repository::RevokedTokenRepository;
