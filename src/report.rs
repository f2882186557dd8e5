//! Delimited report artifacts for a comparison result

use crate::engine::ComparisonResult;
use crate::error::{Result, TabcompareError};
use crate::table::Table;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const MISMATCHES_FILE: &str = "total_data_break.csv";
pub const SOURCE_ONLY_FILE: &str = "only_in_source.csv";
pub const TARGET_ONLY_FILE: &str = "only_in_target.csv";
pub const SOURCE_DUPLICATES_FILE: &str = "source_key_duplicate.csv";
pub const TARGET_DUPLICATES_FILE: &str = "target_key_duplicate.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

/// Locations of the artifacts written for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    pub mismatches: PathBuf,
    pub source_only: PathBuf,
    pub target_only: PathBuf,
    pub source_duplicates: PathBuf,
    pub target_duplicates: PathBuf,
    pub summary: PathBuf,
}

impl ReportPaths {
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        [
            &self.mismatches,
            &self.source_only,
            &self.target_only,
            &self.source_duplicates,
            &self.target_duplicates,
            &self.summary,
        ]
        .into_iter()
    }
}

/// Writes tables as CSV into one output directory
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer, creating the output directory if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .map_err(|e| TabcompareError::write(&output_dir, e))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `table` with a header row to `file_name`.
    ///
    /// The content goes to a temporary file in the same directory that is
    /// renamed into place only once fully written and flushed.
    pub fn write(&self, table: &Table, file_name: &str) -> Result<PathBuf> {
        let destination = self.output_dir.join(file_name);
        write_atomic(table, &self.output_dir, &destination)
            .map_err(|e| TabcompareError::write(&destination, e))?;
        log::debug!("Wrote {} rows to '{}'", table.len(), destination.display());
        Ok(destination)
    }

    /// Write all six artifacts of a comparison run
    pub fn write_all(&self, result: &ComparisonResult) -> Result<ReportPaths> {
        Ok(ReportPaths {
            mismatches: self.write(&result.mismatch_table(), MISMATCHES_FILE)?,
            source_only: self.write(&result.source_only, SOURCE_ONLY_FILE)?,
            target_only: self.write(&result.target_only, TARGET_ONLY_FILE)?,
            source_duplicates: self.write(&result.source_duplicates, SOURCE_DUPLICATES_FILE)?,
            target_duplicates: self.write(&result.target_duplicates, TARGET_DUPLICATES_FILE)?,
            summary: self.write(&result.summary.to_table(), SUMMARY_FILE)?,
        })
    }
}

fn write_atomic(table: &Table, dir: &Path, destination: &Path) -> anyhow::Result<()> {
    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = csv::Writer::from_writer(temp);

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_field()))?;
    }

    let mut temp = writer.into_inner().map_err(|e| e.into_error())?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(destination)?;
    Ok(())
}
