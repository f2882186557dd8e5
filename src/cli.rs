//! Command-line interface for tabcompare

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabcompare")]
#[command(about = "Compare two tabular files on a primary key")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Default log filter: `debug` with `--verbose`, otherwise `info`
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a source file against a target file
    Compare {
        /// Source file (.dat, .csv, .xml or .json)
        source: PathBuf,

        /// Target file (.dat, .csv, .xml or .json)
        target: PathBuf,

        /// Primary key column; repeat or comma-separate for composite keys
        #[arg(long = "key", short = 'k', required = true, value_delimiter = ',', value_parser = validate_key)]
        keys: Vec<String>,

        /// Column mapping file for fixed-width inputs
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Directory for the report files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Hide progress spinners
        #[arg(long)]
        quiet: bool,
    },

    /// Load one file and show the columns it produces
    Schema {
        /// Input file (.dat, .csv, .xml or .json)
        input: PathBuf,

        /// Column mapping file for fixed-width inputs
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

/// Key names must not be blank
fn validate_key(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Primary key column name must not be empty".to_string());
    }
    Ok(s.to_string())
}
