//! Column mapping specification for fixed-width inputs

use crate::config::MappingColumns;
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::path::Path;

/// One field of a fixed-width layout: characters `start..end` of each line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub start: usize,
    pub end: usize,
    pub name: String,
}

/// Read a mapping CSV. Header names are matched after trimming, field names are
/// trimmed, and both offsets must be non-negative integers.
pub fn read_mapping(path: &Path, columns: &MappingColumns) -> Result<Vec<FieldSpec>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open mapping file: {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .context("Failed to read mapping headers")?
        .clone();
    let find = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.trim() == wanted.trim())
            .ok_or_else(|| anyhow!("Mapping file is missing required column '{}'", wanted))
    };
    let name_idx = find(&columns.field_name)?;
    let start_idx = find(&columns.start_position)?;
    let end_idx = find(&columns.end_position)?;

    let mut fields: Vec<FieldSpec> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read mapping row {}", line + 2))?;
        let get = |idx: usize| record.get(idx).unwrap_or("").trim();

        let name = get(name_idx).to_string();
        let start = parse_offset(get(start_idx))
            .with_context(|| format!("Invalid start offset in mapping row {}", line + 2))?;
        let end = parse_offset(get(end_idx))
            .with_context(|| format!("Invalid end offset in mapping row {}", line + 2))?;

        if fields.iter().any(|f| f.name == name) {
            return Err(anyhow!("Duplicate field name '{}' in mapping row {}", name, line + 2));
        }
        fields.push(FieldSpec { start, end, name });
    }

    Ok(fields)
}

fn parse_offset(raw: &str) -> Result<usize> {
    raw.parse::<usize>()
        .map_err(|_| anyhow!("'{}' is not a non-negative integer", raw))
}
