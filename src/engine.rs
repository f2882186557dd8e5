//! Comparison engine: loads both sides into one store session and computes
//! the mismatch, one-sided, duplicate-key and summary reports

use crate::adapters;
use crate::config::CompareConfig;
use crate::error::{Result, TabcompareError};
use crate::sql::{distinct_key_count, duplicate_key_rows, type_family, KeyJoin};
use crate::store::Store;
use crate::table::{CellValue, Side, Table};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// One differing non-key column of a key-matched row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMismatch {
    pub column: String,
    pub expected: CellValue,
    pub actual: CellValue,
}

/// A key-matched row with at least one differing non-key column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchRecord {
    /// Key values in primary-key order
    pub key: Vec<CellValue>,
    pub fields: Vec<FieldMismatch>,
}

/// Run-level counts.
///
/// `source_key_duplicate` and `target_key_duplicate` hold the number of
/// *distinct* key combinations on each side, not a count of duplicated keys.
/// The field names follow the established report header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub source_total: i64,
    pub target_total: i64,
    pub total_data_breaks: i64,
    pub only_in_source: i64,
    pub only_in_target: i64,
    pub source_key_duplicate: i64,
    pub target_key_duplicate: i64,
    /// Rows produced by the inner key join; not part of the summary report
    pub key_matched: i64,
}

impl Summary {
    pub const HEADERS: [&'static str; 7] = [
        "Source Total",
        "Target Total",
        "Total Data Breaks",
        "Only in Source",
        "Only in Target",
        "Source Key Duplicate",
        "Target Key Duplicate",
    ];

    /// Single-row table in report column order
    pub fn to_table(&self) -> Table {
        let values = [
            self.source_total,
            self.target_total,
            self.total_data_breaks,
            self.only_in_source,
            self.only_in_target,
            self.source_key_duplicate,
            self.target_key_duplicate,
        ];
        Table {
            columns: Self::HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: vec![values.iter().map(|v| CellValue::Int(*v)).collect()],
        }
    }
}

/// Everything one comparison run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub primary_keys: Vec<String>,
    pub mismatches: Vec<MismatchRecord>,
    pub source_only: Table,
    pub target_only: Table,
    pub source_duplicates: Table,
    pub target_duplicates: Table,
    pub summary: Summary,
}

impl ComparisonResult {
    /// Mismatches as a flat table: key columns, then `C_Expected`/`C_Actual`
    /// pairs in first-appearance order. Rows lacking a pair leave it NULL.
    pub fn mismatch_table(&self) -> Table {
        let mut pair_columns: IndexSet<&str> = IndexSet::new();
        for record in &self.mismatches {
            pair_columns.extend(record.fields.iter().map(|f| f.column.as_str()));
        }

        let mut columns = self.primary_keys.clone();
        for col in &pair_columns {
            columns.push(format!("{}_Expected", col));
            columns.push(format!("{}_Actual", col));
        }

        let rows = self
            .mismatches
            .iter()
            .map(|record| {
                let mut row = record.key.clone();
                for col in &pair_columns {
                    match record.fields.iter().find(|f| f.column == *col) {
                        Some(f) => {
                            row.push(f.expected.clone());
                            row.push(f.actual.clone());
                        }
                        None => {
                            row.push(CellValue::Null);
                            row.push(CellValue::Null);
                        }
                    }
                }
                row
            })
            .collect();

        Table { columns, rows }
    }

    pub fn has_differences(&self) -> bool {
        !self.mismatches.is_empty()
            || !self.source_only.is_empty()
            || !self.target_only.is_empty()
            || !self.source_duplicates.is_empty()
            || !self.target_duplicates.is_empty()
    }
}

/// A store session plus the two loaded tables.
///
/// The session owns its DuckDB connection exclusively; concurrent comparisons
/// each open their own session. The target can be reloaded for a follow-up
/// run against the same source.
pub struct ComparisonSession {
    store: Store,
    config: CompareConfig,
    source_columns: Option<Vec<String>>,
    target_columns: Option<Vec<String>>,
}

impl ComparisonSession {
    pub fn open(config: CompareConfig) -> Result<Self> {
        config.validate()?;
        let store = Store::open(&config.store)?;
        Ok(Self {
            store,
            config,
            source_columns: None,
            target_columns: None,
        })
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    pub fn load_source(&mut self, path: &Path, mapping: Option<&Path>) -> Result<&[String]> {
        let columns = adapters::load(
            &mut self.store,
            path,
            &self.config.source_table,
            mapping,
            &self.config,
        )?;
        Ok(self.source_columns.insert(columns).as_slice())
    }

    pub fn load_target(&mut self, path: &Path, mapping: Option<&Path>) -> Result<&[String]> {
        let columns = adapters::load(
            &mut self.store,
            path,
            &self.config.target_table,
            mapping,
            &self.config,
        )?;
        Ok(self.target_columns.insert(columns).as_slice())
    }

    /// Compute every report for the loaded tables
    pub fn run(&self, primary_keys: &[String]) -> Result<ComparisonResult> {
        log::info!("Running data comparison on keys [{}]", primary_keys.join(", "));
        let start = Instant::now();

        let (src_cols, trg_cols) = match (&self.source_columns, &self.target_columns) {
            (Some(s), Some(t)) => (s.as_slice(), t.as_slice()),
            _ => {
                return Err(TabcompareError::invalid_input(
                    "Both source and target must be loaded before comparing",
                ))
            }
        };
        validate_keys(primary_keys, src_cols, trg_cols)?;

        let src = self.config.source_table.as_str();
        let trg = self.config.target_table.as_str();
        self.validate_key_types(primary_keys)?;
        let join = KeyJoin::new(src, trg, primary_keys);

        let mismatches = timed("Total data break query", || {
            self.find_mismatches(&join, src_cols, trg_cols, primary_keys)
        })?;
        let source_only = timed("Only in source query", || {
            self.store.query_table(&join.left_anti(), src_cols.to_vec())
        })?;
        let target_only = timed("Only in target query", || {
            self.store
                .query_table(&join.reversed().left_anti(), trg_cols.to_vec())
        })?;
        let source_duplicates = timed("Source key duplicate query", || {
            self.store
                .query_table(&duplicate_key_rows(src, primary_keys), src_cols.to_vec())
        })?;
        let target_duplicates = timed("Target key duplicate query", || {
            self.store
                .query_table(&duplicate_key_rows(trg, primary_keys), trg_cols.to_vec())
        })?;

        let summary = Summary {
            source_total: self.store.row_count(src)?,
            target_total: self.store.row_count(trg)?,
            total_data_breaks: count_of(mismatches.len())?,
            only_in_source: count_of(source_only.len())?,
            only_in_target: count_of(target_only.len())?,
            source_key_duplicate: self.store.count(&distinct_key_count(src, primary_keys))?,
            target_key_duplicate: self.store.count(&distinct_key_count(trg, primary_keys))?,
            key_matched: self.store.count(&join.inner_count())?,
        };

        log::info!("Data comparison completed in {:.3?}", start.elapsed());
        Ok(ComparisonResult {
            primary_keys: primary_keys.to_vec(),
            mismatches,
            source_only,
            target_only,
            source_duplicates,
            target_duplicates,
            summary,
        })
    }

    /// Key columns must share a type family on both sides, otherwise the join
    /// would cast one side and either fail or match values of different types
    fn validate_key_types(&self, primary_keys: &[String]) -> Result<()> {
        let src_types = self.store.describe(&self.config.source_table)?;
        let trg_types = self.store.describe(&self.config.target_table)?;
        let type_of = |types: &[(String, String)], key: &str| {
            types
                .iter()
                .find(|(col, _)| col == key)
                .map(|(_, ty)| ty.clone())
                .unwrap_or_default()
        };

        for key in primary_keys {
            let source_type = type_of(&src_types, key);
            let target_type = type_of(&trg_types, key);
            if type_family(&source_type) != type_family(&target_type) {
                return Err(TabcompareError::key_type_mismatch(
                    key.clone(),
                    source_type,
                    target_type,
                ));
            }
        }
        Ok(())
    }

    /// Left-join source to target and keep key-matched rows with differences
    fn find_mismatches(
        &self,
        join: &KeyJoin,
        src_cols: &[String],
        trg_cols: &[String],
        primary_keys: &[String],
    ) -> Result<Vec<MismatchRecord>> {
        let offset = src_cols.len();
        let combined: Vec<String> = src_cols.iter().chain(trg_cols).cloned().collect();
        let joined = self.store.query_table(&join.left_join_all(), combined)?;

        // Positions are resolved once; target lookups go by column name
        let key_positions: Vec<usize> = primary_keys
            .iter()
            .filter_map(|k| position(src_cols, k))
            .collect();
        let match_marker = position(trg_cols, &primary_keys[0]).map(|i| offset + i);
        let plan: Vec<(&str, usize, Option<usize>)> = src_cols
            .iter()
            .enumerate()
            .filter(|(_, col)| !primary_keys.contains(*col))
            .map(|(i, col)| (col.as_str(), i, position(trg_cols, col).map(|j| offset + j)))
            .collect();

        let mut records = Vec::new();
        for row in &joined.rows {
            let matched = match_marker.map(|i| !row[i].is_null()).unwrap_or(false);
            if !matched {
                continue;
            }

            let fields: Vec<FieldMismatch> = plan
                .iter()
                .filter_map(|(col, src_idx, trg_idx)| {
                    let expected = &row[*src_idx];
                    let actual = trg_idx.map(|i| &row[i]).unwrap_or(&CellValue::Null);
                    (expected != actual).then(|| FieldMismatch {
                        column: col.to_string(),
                        expected: expected.clone(),
                        actual: actual.clone(),
                    })
                })
                .collect();

            if !fields.is_empty() {
                records.push(MismatchRecord {
                    key: key_positions.iter().map(|&i| row[i].clone()).collect(),
                    fields,
                });
            }
        }

        Ok(records)
    }
}

/// Load both files into a fresh session, compare, and release the session
pub fn compare(
    source: &Path,
    target: &Path,
    primary_keys: &[String],
    mapping: Option<&Path>,
    config: &CompareConfig,
) -> Result<ComparisonResult> {
    let mut session = ComparisonSession::open(config.clone())?;
    session.load_source(source, mapping)?;
    session.load_target(target, mapping)?;
    session.run(primary_keys)
}

fn validate_keys(primary_keys: &[String], src_cols: &[String], trg_cols: &[String]) -> Result<()> {
    if primary_keys.is_empty() {
        return Err(TabcompareError::invalid_input(
            "At least one primary key column is required",
        ));
    }
    for key in primary_keys {
        if !src_cols.contains(key) {
            return Err(TabcompareError::missing_key(key.clone(), Side::Source));
        }
        if !trg_cols.contains(key) {
            return Err(TabcompareError::missing_key(key.clone(), Side::Target));
        }
    }
    Ok(())
}

fn count_of(len: usize) -> Result<i64> {
    i64::try_from(len)
        .map_err(|_| TabcompareError::invalid_input(format!("Row count {} out of range", len)))
}

fn position(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c == name)
}

fn timed<T>(label: &str, step: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let result = step()?;
    log::info!("{} completed in {:.3?}", label, start.elapsed());
    Ok(result)
}
