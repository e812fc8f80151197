//! Chart validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static CHART_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("Invalid chart name regex"));

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartValidationError {
    #[error("Chart name can only contain lowercase alphanumeric characters and hyphens")]
    InvalidName,
}

/// Chart names double as file names and URL segments: `[a-z0-9-]+`
pub fn validate_chart_name(name: &str) -> Result<(), ChartValidationError> {
    if CHART_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(ChartValidationError::InvalidName)
    }
}
