//! Command line interface
//!
//! - `serve`: run the HTTP API
//! - `seed`: load users and charts from CSV files without starting the server

pub mod seed;
pub mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Chart Evaluation API - LLM-assisted questions about chart images
#[derive(Parser)]
#[command(name = "chart-evaluation")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve(ServeArgs),

    /// Replace users and/or charts from CSV files
    Seed(SeedArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Keep all data in an in-memory database that is lost on shutdown
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// CSV file with columns username,password[,full_name,disabled,type]
    #[arg(long, value_name = "FILE")]
    pub users: Option<PathBuf>,

    /// CSV file with columns name,description,instruction,url
    #[arg(long, value_name = "FILE")]
    pub charts: Option<PathBuf>,
}

/// Load `.env` and `api.env`, then the layered configuration, and start logging
pub(crate) fn init() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    dotenvy::from_filename("api.env").ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["chart-evaluation", "serve", "--in-memory"]).unwrap();
        match cli.command {
            Command::Serve(args) => assert!(args.in_memory),
            Command::Seed(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_seed() {
        let cli = Cli::try_parse_from([
            "chart-evaluation",
            "seed",
            "--users",
            "users.csv",
            "--charts",
            "charts.csv",
        ])
        .unwrap();

        match cli.command {
            Command::Seed(args) => {
                assert_eq!(args.users, Some(PathBuf::from("users.csv")));
                assert_eq!(args.charts, Some(PathBuf::from("charts.csv")));
            }
            Command::Serve(_) => panic!("expected seed"),
        }
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["chart-evaluation"]).is_err());
    }
}
