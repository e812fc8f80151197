//! CSV parsing for user and chart resets
//!
//! Rows are validated up front so that a bad file never touches storage.

use serde::Deserialize;
use std::collections::HashSet;

use crate::domain::chart::Chart;
use crate::domain::user::{validate_password, validate_username, UserType};
use crate::domain::DomainError;

/// A user row with its plain-text password, before hashing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub disabled: bool,
    pub user_type: UserType,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    username: Option<String>,
    password: Option<String>,
    full_name: Option<String>,
    disabled: Option<String>,
    #[serde(rename = "type")]
    user_type: Option<String>,
}

/// Every column must be present in the header; empty cells are allowed
#[derive(Debug, Deserialize)]
struct ChartRow {
    name: String,
    description: String,
    instruction: String,
    url: String,
}

const CHART_COLUMNS: [&str; 4] = ["name", "description", "instruction", "url"];

fn reader(data: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(data)
}

fn row_error(line: usize, message: impl std::fmt::Display) -> DomainError {
    DomainError::validation(format!("Invalid row at line {}: {}", line, message))
}

fn required(value: Option<String>, column: &str, line: usize) -> Result<String, DomainError> {
    value.ok_or_else(|| row_error(line, format!("missing '{}'", column)))
}

/// Parse a users file. `reserved` usernames may not appear in it.
pub fn parse_users(data: &[u8], reserved: &[&str]) -> Result<Vec<UserRecord>, DomainError> {
    let mut seen: HashSet<String> = reserved.iter().map(|s| s.to_string()).collect();
    let mut records = Vec::new();

    for (index, row) in reader(data).deserialize::<UserRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = row.map_err(|e| row_error(line, e))?;

        let username = required(row.username, "username", line)?;
        let password = required(row.password, "password", line)?;
        validate_username(&username).map_err(|e| row_error(line, e))?;
        validate_password(&password).map_err(|e| row_error(line, e))?;

        let user_type = match row.user_type {
            Some(value) => value.parse().map_err(|e| row_error(line, e))?,
            None => UserType::User,
        };

        if !seen.insert(username.clone()) {
            return Err(row_error(line, format!("duplicate username '{}'", username)));
        }

        records.push(UserRecord {
            username,
            password,
            full_name: row.full_name.unwrap_or_else(|| "Unknown".to_string()),
            disabled: row
                .disabled
                .is_some_and(|d| d.eq_ignore_ascii_case("true")),
            user_type,
        });
    }

    Ok(records)
}

/// Parse a charts file; every column is required, values may be empty
pub fn parse_charts(data: &[u8]) -> Result<Vec<Chart>, DomainError> {
    let mut seen = HashSet::new();
    let mut charts = Vec::new();
    let mut reader = reader(data);

    let headers = reader
        .headers()
        .map_err(|e| DomainError::validation(format!("Invalid header: {}", e)))?
        .clone();

    if headers.is_empty() {
        return Ok(charts);
    }

    if let Some(column) = CHART_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(DomainError::validation(format!(
            "Invalid header: missing column '{}'",
            column
        )));
    }

    for (index, row) in reader.deserialize::<ChartRow>().enumerate() {
        let line = index + 2;
        let row = row.map_err(|e| row_error(line, e))?;

        let chart = Chart::new(row.name, row.description, row.instruction, row.url)
            .map_err(|e| row_error(line, e))?;

        if !seen.insert(chart.name.clone()) {
            return Err(row_error(line, format!("duplicate chart '{}'", chart.name)));
        }

        charts.push(chart);
    }

    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_defaults() {
        let csv = b"username,password\nalice@example.com,pw1\nbob,pw2\n";
        let users = parse_users(csv, &["admin"]).unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice@example.com");
        assert_eq!(users[0].full_name, "Unknown");
        assert!(!users[0].disabled);
        assert_eq!(users[0].user_type, UserType::User);
    }

    #[test]
    fn test_parse_users_all_columns() {
        let csv = b"username,full_name,disabled,type,password\n\
                    carol,Carol C,TRUE,admin,pw\n\
                    dave,Dave D,no,user,pw\n";
        let users = parse_users(csv, &[]).unwrap();

        assert_eq!(users[0].full_name, "Carol C");
        assert!(users[0].disabled);
        assert_eq!(users[0].user_type, UserType::Admin);
        assert!(!users[1].disabled);
    }

    #[test]
    fn test_parse_users_missing_password() {
        let csv = b"username,password\nalice,pw\nbob,\n";
        let err = parse_users(csv, &[]).unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(err.message(), "Invalid row at line 3: missing 'password'");
    }

    #[test]
    fn test_parse_users_reserved_and_duplicates() {
        let err = parse_users(b"username,password\nadmin,pw\n", &["admin"]).unwrap_err();
        assert!(err.message().contains("duplicate username 'admin'"));

        let err = parse_users(b"username,password\na,pw\na,pw\n", &[]).unwrap_err();
        assert!(err.message().starts_with("Invalid row at line 3"));
    }

    #[test]
    fn test_parse_users_unknown_type() {
        let err = parse_users(b"username,password,type\na,pw,root\n", &[]).unwrap_err();
        assert!(err.message().contains("Unknown user type"));
    }

    #[test]
    fn test_parse_charts() {
        let csv = b"name,description,instruction,url\n\
                    sales-2024,Sales,\"Explain, briefly\",https://x/s.png\n";
        let charts = parse_charts(csv).unwrap();

        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].instruction, "Explain, briefly");
    }

    #[test]
    fn test_parse_charts_invalid_name() {
        let csv = b"name,description,instruction,url\nSales 2024,S,I,https://x\n";
        let err = parse_charts(csv).unwrap_err();

        assert!(err.message().contains("lowercase alphanumeric"));
    }

    #[test]
    fn test_parse_charts_missing_column() {
        let csv = b"name,description,url\nsales,S,https://x\n";
        let err = parse_charts(csv).unwrap_err();

        assert_eq!(err.message(), "Invalid header: missing column 'instruction'");
    }

    #[test]
    fn test_parse_charts_accepts_blank_cells() {
        let csv = b"name,description,instruction,url\nsales,,Explain,https://x/s.png\ncosts,Costs,,\n";
        let charts = parse_charts(csv).unwrap();

        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].description, "");
        assert_eq!(charts[0].instruction, "Explain");
        assert_eq!(charts[1].instruction, "");
        assert_eq!(charts[1].url, "");
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_charts(b"").unwrap().is_empty());
        assert!(parse_users(b"username,password\n", &[]).unwrap().is_empty());
    }
}
