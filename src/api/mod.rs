//! API layer - HTTP endpoints and middleware

pub mod charts;
pub mod evaluations;
pub mod health;
pub mod middleware;
pub mod reset;
pub mod router;
pub mod state;
pub mod types;
pub mod users;

pub use router::create_router;
pub use state::AppState;
