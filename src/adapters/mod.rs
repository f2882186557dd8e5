//! Format adapters: turn a fixed-width, CSV, XML or JSON file into a table
//! registered in the store

mod fixed_width;
mod json;
mod mapping;
mod xml;

use crate::config::CompareConfig;
use crate::error::{Result, TabcompareError};
use crate::store::Store;
use std::fmt;
use std::path::Path;
use std::time::Instant;

pub use fixed_width::{read_fixed_width, slice_field};
pub use json::read_json;
pub use mapping::{read_mapping, FieldSpec};
pub use xml::read_xml;

/// Input formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    FixedWidth,
    Csv,
    Xml,
    Json,
}

impl FileFormat {
    /// Detect the format from the extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "dat" => Ok(Self::FixedWidth),
            "csv" => Ok(Self::Csv),
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            _ => Err(TabcompareError::unsupported_format(format!(".{}", extension))),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::FixedWidth => "fixed-width",
            FileFormat::Csv => "csv",
            FileFormat::Xml => "xml",
            FileFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Load `path` into the store as `table_name` and return its ordered column list.
///
/// Any existing table of that name is replaced. On failure nothing is
/// registered and the error names the offending path.
pub fn load(
    store: &mut Store,
    path: &Path,
    table_name: &str,
    mapping: Option<&Path>,
    config: &CompareConfig,
) -> Result<Vec<String>> {
    let format = FileFormat::from_path(path)?;
    log::info!("Loading {} file '{}' into '{}'", format, path.display(), table_name);
    let start = Instant::now();

    if !path.is_file() {
        return Err(TabcompareError::load(
            path,
            anyhow::anyhow!("file not found"),
        ));
    }

    match format {
        FileFormat::Csv => {
            store
                .ingest_csv(table_name, path, config.csv_sample_size)
                .map_err(|e| TabcompareError::load(path, e))?;
        }
        FileFormat::FixedWidth => {
            let mapping = mapping.ok_or_else(|| {
                TabcompareError::load(
                    path,
                    anyhow::anyhow!("fixed-width input requires a column mapping file"),
                )
            })?;
            let fields = read_mapping(mapping, &config.mapping_columns)
                .map_err(|e| TabcompareError::load(mapping, e))?;
            let table = read_fixed_width(path, &fields).map_err(|e| TabcompareError::load(path, e))?;
            store
                .register_table(table_name, &table)
                .map_err(|e| TabcompareError::load(path, e))?;
        }
        FileFormat::Xml => {
            let table = read_xml(path).map_err(|e| TabcompareError::load(path, e))?;
            store
                .register_table(table_name, &table)
                .map_err(|e| TabcompareError::load(path, e))?;
        }
        FileFormat::Json => {
            let table = read_json(path).map_err(|e| TabcompareError::load(path, e))?;
            store
                .register_table(table_name, &table)
                .map_err(|e| TabcompareError::load(path, e))?;
        }
    }

    let columns = store
        .columns(table_name)
        .map_err(|e| TabcompareError::load(path, e))?;
    log::info!(
        "Loaded '{}' ({} columns) in {:.3?}",
        path.display(),
        columns.len(),
        start.elapsed()
    );
    Ok(columns)
}
