//! Revoked token storage

mod repository;
mod sqlite_repository;

pub use repository::InMemoryRevokedTokenRepository;
pub use sqlite_repository::SqliteRevokedTokenRepository;
