//! # tabcompare
//!
//! Compares two tabular files (fixed-width, CSV, XML or JSON) on a set of
//! primary-key columns and reports field-level mismatches, rows present on
//! only one side, duplicate keys and summary counts.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod progress;
pub mod report;
pub mod sql;
pub mod store;
pub mod table;

pub use config::CompareConfig;
pub use engine::{compare, ComparisonResult, ComparisonSession, Summary};
pub use error::{Result, TabcompareError};
pub use report::ReportWriter;
pub use table::{CellValue, Side, Table};
