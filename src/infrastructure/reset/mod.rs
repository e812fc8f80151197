//! Bulk resets from CSV uploads

mod csv_import;
mod service;

pub use csv_import::{parse_charts, parse_users, UserRecord};
pub use service::{ResetService, ADMIN_USERNAME};
