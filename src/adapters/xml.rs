//! XML record reader.
//!
//! Each child of the root element is one record. A record's attributes and the
//! text of its direct child elements become columns; anything nested deeper is
//! not flattened.

use crate::table::{CellValue, Table};
use anyhow::{bail, Context, Result};
use indexmap::{IndexMap, IndexSet};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

const RECORD_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

type Record = IndexMap<String, Option<String>>;

pub fn read_xml(path: &Path) -> Result<Table> {
    let mut reader = Reader::from_file(path)
        .with_context(|| format!("Failed to open XML file: {}", path.display()))?;

    let mut records: Vec<Record> = Vec::new();
    let mut current: Option<Record> = None;
    let mut field: Option<(String, String)> = None;
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .with_context(|| format!("Malformed XML at byte {}", reader.buffer_position()))?;
        match event {
            Event::Start(e) => {
                depth += 1;
                if depth == RECORD_DEPTH {
                    current = Some(record_from_attributes(&e)?);
                } else if depth == FIELD_DEPTH {
                    field = Some((element_name(&e)?, String::new()));
                }
            }
            Event::Empty(e) => {
                if depth + 1 == RECORD_DEPTH {
                    records.push(record_from_attributes(&e)?);
                } else if depth + 1 == FIELD_DEPTH {
                    if let Some(record) = current.as_mut() {
                        record.entry(element_name(&e)?).or_insert(None);
                    }
                }
            }
            Event::Text(t) if depth == FIELD_DEPTH => {
                // Whitespace-only nodes are layout; padding inside a value is kept
                let content = t.unescape()?;
                if let Some((_, text)) = field.as_mut() {
                    if !content.trim().is_empty() {
                        text.push_str(&content);
                    }
                }
            }
            Event::CData(c) if depth == FIELD_DEPTH => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                if depth == FIELD_DEPTH {
                    if let (Some(record), Some((name, text))) = (current.as_mut(), field.take()) {
                        let value = if text.is_empty() { None } else { Some(text) };
                        record.insert(name, value);
                    }
                } else if depth == RECORD_DEPTH {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        bail!("Unexpected end of XML document");
    }

    let mut column_names: IndexSet<String> = IndexSet::new();
    for record in &records {
        column_names.extend(record.keys().cloned());
    }
    if column_names.is_empty() {
        bail!("XML contains no record fields");
    }

    let columns: Vec<String> = column_names.into_iter().collect();
    let converted: Vec<Vec<CellValue>> = {
        let kinds: Vec<TextKind> = columns
            .iter()
            .map(|col| {
                infer_text_kind(
                    records
                        .iter()
                        .filter_map(|r| r.get(col).and_then(|v| v.as_deref())),
                )
            })
            .collect();
        records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .zip(&kinds)
                    .map(|(col, kind)| match record.get(col).and_then(|v| v.as_deref()) {
                        Some(raw) => kind.convert(raw),
                        None => CellValue::Null,
                    })
                    .collect()
            })
            .collect()
    };

    Ok(Table::with_rows(columns, converted)?)
}

fn element_name(e: &BytesStart<'_>) -> Result<String> {
    let name = std::str::from_utf8(e.name().as_ref())
        .context("Element name is not valid UTF-8")?
        .to_string();
    Ok(name)
}

fn record_from_attributes(e: &BytesStart<'_>) -> Result<Record> {
    let mut record = Record::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .context("Attribute name is not valid UTF-8")?
            .to_string();
        let value = attr.unescape_value()?.into_owned();
        record.insert(key, Some(value));
    }
    Ok(record)
}

/// Narrowest type every value of a column parses as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextKind {
    Int,
    Float,
    Text,
}

impl TextKind {
    fn convert(&self, raw: &str) -> CellValue {
        match self {
            TextKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(CellValue::Int)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            TextKind::Float => raw
                .trim()
                .parse::<f64>()
                .map(CellValue::Float)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            TextKind::Text => CellValue::Text(raw.to_string()),
        }
    }
}

fn infer_text_kind<'a>(values: impl Iterator<Item = &'a str>) -> TextKind {
    let mut kind = TextKind::Int;
    let mut any = false;
    for raw in values {
        any = true;
        let raw = raw.trim();
        if kind == TextKind::Int && raw.parse::<i64>().is_err() {
            kind = TextKind::Float;
        }
        if kind == TextKind::Float && !is_decimal(raw) {
            return TextKind::Text;
        }
    }
    if any {
        kind
    } else {
        TextKind::Text
    }
}

/// Plain decimal notation only; words like "inf" or "NaN" stay text
fn is_decimal(raw: &str) -> bool {
    raw.parse::<f64>().is_ok()
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}
