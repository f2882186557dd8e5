//! Fixed-width (`.dat`) reader

use super::mapping::FieldSpec;
use crate::table::{CellValue, Table};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Slice characters `start..end` of `line` and trim the result.
///
/// Out-of-range offsets truncate instead of failing: a line shorter than
/// `start` yields an empty string, and `end` is clamped to the line length.
pub fn slice_field(line: &str, start: usize, end: usize) -> String {
    if start >= end {
        return String::new();
    }
    line.chars()
        .skip(start)
        .take(end - start)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Read every line of `path` into a text-only table using the mapping layout
pub fn read_fixed_width(path: &Path, fields: &[FieldSpec]) -> Result<Table> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open fixed-width file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let columns = fields.iter().map(|f| f.name.clone()).collect();
    let mut table = Table::new(columns);

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        let row = fields
            .iter()
            .map(|f| CellValue::Text(slice_field(&line, f.start, f.end)))
            .collect();
        table.push_row(row)?;
    }

    log::debug!("Read {} fixed-width rows from '{}'", table.len(), path.display());
    Ok(table)
}
