use serde::{Deserialize, Serialize};

use super::validation::{validate_chart_name, ChartValidationError};

/// Chart image with the instruction used to evaluate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub name: String,
    pub description: String,
    /// System prompt opening every evaluation of this chart
    pub instruction: String,
    /// Image URL attached to the first question
    pub url: String,
}

impl Chart {
    /// Create a chart, validating its name
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self, ChartValidationError> {
        let chart = Self {
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
            url: url.into(),
        };
        chart.validate()?;
        Ok(chart)
    }

    pub fn validate(&self) -> Result<(), ChartValidationError> {
        validate_chart_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chart() {
        let chart = Chart::new("chart-a", "Sales", "Explain the chart", "https://x/a.png").unwrap();
        assert_eq!(chart.name, "chart-a");
    }

    #[test]
    fn test_new_chart_rejects_bad_name() {
        let result = Chart::new("Chart A", "Sales", "Explain", "https://x/a.png");
        assert_eq!(result.unwrap_err(), ChartValidationError::InvalidName);
    }

    #[test]
    fn test_new_chart_allows_empty_text_fields() {
        let chart = Chart::new("chart-a", "", "", "").unwrap();
        assert!(chart.description.is_empty());
    }
}
