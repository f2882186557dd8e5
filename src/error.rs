//! Error types for tabcompare operations

use crate::table::Side;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabcompareError>;

#[derive(Error, Debug)]
pub enum TabcompareError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Failed to load '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Primary key '{key}' not found in {side} columns")]
    MissingKeyColumn { key: String, side: Side },

    #[error("Primary key '{key}' is {source_type} in source but {target_type} in target")]
    KeyTypeMismatch {
        key: String,
        source_type: String,
        target_type: String,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl TabcompareError {
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn load(path: &Path, source: impl Into<anyhow::Error>) -> Self {
        Self::Load {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn missing_key(key: impl Into<String>, side: Side) -> Self {
        Self::MissingKeyColumn {
            key: key.into(),
            side,
        }
    }

    pub fn key_type_mismatch(
        key: impl Into<String>,
        source_type: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self::KeyTypeMismatch {
            key: key.into(),
            source_type: source_type.into(),
            target_type: target_type.into(),
        }
    }

    pub fn write(path: &Path, source: impl Into<anyhow::Error>) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
