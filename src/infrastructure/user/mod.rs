//! User infrastructure module
//!
//! Argon2 password hashing, SQLite and in-memory repositories, and the
//! user service handling accounts, login and token checks.

mod password;
mod repository;
mod service;
mod sqlite_repository;

pub use password::{random_password, Argon2Hasher, PasswordHasher};
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
pub use sqlite_repository::SqliteUserRepository;
