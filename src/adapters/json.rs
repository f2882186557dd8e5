//! JSON record-array reader

use crate::table::{CellValue, Table};
use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a top-level array of objects (or a single object) into a table.
///
/// Columns are the union of object keys in first-appearance order. Nested
/// arrays and objects are not flattened; they are kept as JSON text.
pub fn read_json(path: &Path) -> Result<Table> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .context("Failed to parse JSON file")?;

    let records = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        _ => bail!("JSON must be an array of objects or a single object"),
    };

    let mut column_names: IndexSet<String> = IndexSet::new();
    for (idx, item) in records.iter().enumerate() {
        match item {
            Value::Object(obj) => column_names.extend(obj.keys().cloned()),
            _ => bail!("JSON record {} is not an object", idx),
        }
    }

    if column_names.is_empty() {
        bail!("JSON contains no record fields");
    }

    let mut table = Table::new(column_names.iter().cloned().collect());
    for item in &records {
        if let Value::Object(obj) = item {
            let row = column_names
                .iter()
                .map(|key| json_to_cell(obj.get(key)))
                .collect();
            table.push_row(row)?;
        }
    }

    Ok(table)
}

fn json_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        Some(Value::String(s)) => CellValue::Text(s.clone()),
        Some(nested) => CellValue::Text(nested.to_string()),
    }
}
