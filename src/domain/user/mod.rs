//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including the user entity, validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserType};
pub use repository::UserRepository;
pub use validation::{validate_password, validate_username, UserValidationError};
