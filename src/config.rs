//! Run configuration: output location, store session settings and the
//! header names expected in fixed-width mapping files

use crate::error::{Result, TabcompareError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of rows DuckDB samples when sniffing CSV types
pub const DEFAULT_CSV_SAMPLE_SIZE: usize = 20480;

/// Header names of the three required mapping columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingColumns {
    pub field_name: String,
    pub start_position: String,
    pub end_position: String,
}

impl Default for MappingColumns {
    fn default() -> Self {
        Self {
            field_name: "IGP Base Field".to_string(),
            start_position: "'Start Position'".to_string(),
            end_position: "End Position".to_string(),
        }
    }
}

/// Settings applied to each DuckDB session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// e.g. "4GB"; DuckDB's own default when unset
    pub memory_limit: Option<String>,
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub output_dir: PathBuf,
    pub source_table: String,
    pub target_table: String,
    pub csv_sample_size: usize,
    pub mapping_columns: MappingColumns,
    pub store: StoreSettings,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            source_table: "table_src".to_string(),
            target_table: "table_trg".to_string(),
            csv_sample_size: DEFAULT_CSV_SAMPLE_SIZE,
            mapping_columns: MappingColumns::default(),
            store: StoreSettings::default(),
        }
    }
}

impl CompareConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TabcompareError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: CompareConfig = serde_json::from_str(&content).map_err(|e| {
            TabcompareError::config(format!(
                "Invalid config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_table.trim().is_empty() || self.target_table.trim().is_empty() {
            return Err(TabcompareError::config("Table names must not be empty"));
        }
        if self.source_table == self.target_table {
            return Err(TabcompareError::config(format!(
                "Source and target table names must differ (both are '{}')",
                self.source_table
            )));
        }
        if self.csv_sample_size == 0 {
            return Err(TabcompareError::config("csv_sample_size must be greater than 0"));
        }
        if self.store.threads == Some(0) {
            return Err(TabcompareError::config("store.threads must be greater than 0"));
        }
        Ok(())
    }
}
