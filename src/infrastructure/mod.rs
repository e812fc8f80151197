//! Infrastructure layer - Storage, security and external service implementations

pub mod auth;
pub mod chart;
pub mod evaluation;
pub mod llm;
pub mod logging;
pub mod reset;
pub mod storage;
pub mod token;
pub mod user;
