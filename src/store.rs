//! DuckDB-backed relational store holding the tables of one comparison run

use crate::config::StoreSettings;
use crate::error::Result;
use crate::sql::{path_literal, quote_ident, quote_literal, row_count};
use crate::table::{CellValue, ColumnType, Table};
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::types::{TimeUnit, Value, ValueRef};
use duckdb::{params_from_iter, Connection};
use std::path::Path;

/// One in-memory DuckDB session. Dropping the store releases the connection
/// and every table registered in it.
pub struct Store {
    connection: Connection,
}

impl Store {
    /// Open a fresh in-memory session with the given settings applied
    pub fn open(settings: &StoreSettings) -> Result<Self> {
        let connection = Connection::open_in_memory()?;

        connection.execute("SET enable_progress_bar=false", [])?;
        if let Some(limit) = &settings.memory_limit {
            connection.execute(&format!("SET memory_limit={}", quote_literal(limit)), [])?;
        }
        if let Some(threads) = settings.threads {
            connection.execute(&format!("SET threads={}", threads), [])?;
        }

        log::debug!("Opened DuckDB session");
        Ok(Self { connection })
    }

    /// Register an in-memory table under `name`, replacing any existing table.
    ///
    /// Creation and inserts share one transaction: on failure the previous
    /// table of that name (if any) is left untouched.
    pub fn register_table(&mut self, name: &str, table: &Table) -> Result<()> {
        let types = table.column_types();
        let column_defs = table
            .columns
            .iter()
            .zip(&types)
            .map(|(col, ty)| format!("{} {}", quote_ident(col), ty.sql_name()))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.connection.transaction()?;
        tx.execute(
            &format!("CREATE OR REPLACE TABLE {} ({})", quote_ident(name), column_defs),
            [],
        )?;

        if !table.columns.is_empty() {
            let placeholders = vec!["?"; table.columns.len()].join(", ");
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES ({})",
                quote_ident(name),
                placeholders
            ))?;
            for row in &table.rows {
                let values = row.iter().zip(&types).map(|(cell, ty)| to_sql_value(cell, *ty));
                stmt.execute(params_from_iter(values))?;
            }
            drop(stmt);
        }

        tx.commit()?;
        log::debug!("Registered table '{}' with {} rows", name, table.len());
        Ok(())
    }

    /// Create `name` from a CSV file using DuckDB's header and type sniffing
    pub fn ingest_csv(&self, name: &str, path: &Path, sample_size: usize) -> Result<()> {
        let sql = format!(
            "CREATE OR REPLACE TABLE {} AS SELECT * FROM read_csv_auto({}, header = true, sample_size = {})",
            quote_ident(name),
            path_literal(path),
            sample_size
        );
        self.connection.execute(&sql, [])?;
        Ok(())
    }

    /// Ordered `(name, type)` pairs of a registered table
    pub fn describe(&self, name: &str) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .connection
            .prepare(&format!("DESCRIBE {}", quote_ident(name)))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    /// Ordered column names of a registered table
    pub fn columns(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.describe(name)?.into_iter().map(|(col, _)| col).collect())
    }

    pub fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self.connection.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn row_count(&self, name: &str) -> Result<i64> {
        self.count(&row_count(name))
    }

    /// Run a scalar `COUNT(*)` style query
    pub fn count(&self, sql: &str) -> Result<i64> {
        Ok(self.connection.query_row(sql, [], |row| row.get(0))?)
    }

    /// Run a SELECT and collect its rows under the given column names.
    ///
    /// `columns` must have one entry per selected value.
    pub fn query_table(&self, sql: &str, columns: Vec<String>) -> Result<Table> {
        let width = columns.len();
        let mut stmt = self.connection.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(from_value_ref(row.get_ref(idx)?));
            }
            Ok(values)
        })?;

        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row?)?;
        }
        Ok(table)
    }

    /// Full contents of a registered table
    pub fn fetch_table(&self, name: &str) -> Result<Table> {
        let columns = self.columns(name)?;
        self.query_table(&format!("SELECT * FROM {} ORDER BY rowid", quote_ident(name)), columns)
    }
}

fn to_sql_value(cell: &CellValue, ty: ColumnType) -> Value {
    match (cell, ty) {
        (CellValue::Null, _) => Value::Null,
        (CellValue::Int(i), ColumnType::BigInt) => Value::BigInt(*i),
        (CellValue::Int(i), ColumnType::Double) => Value::Double(*i as f64),
        (CellValue::Float(f), ColumnType::Double) => Value::Double(*f),
        (CellValue::Bool(b), ColumnType::Boolean) => Value::Boolean(*b),
        (other, _) => Value::Text(other.to_field()),
    }
}

fn to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

/// Convert a DuckDB value into a cell, keeping its type where one is modelled
fn from_value_ref(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Boolean(b) => CellValue::Bool(b),
        ValueRef::TinyInt(i) => CellValue::Int(i as i64),
        ValueRef::SmallInt(i) => CellValue::Int(i as i64),
        ValueRef::Int(i) => CellValue::Int(i as i64),
        ValueRef::BigInt(i) => CellValue::Int(i),
        ValueRef::UTinyInt(i) => CellValue::Int(i as i64),
        ValueRef::USmallInt(i) => CellValue::Int(i as i64),
        ValueRef::UInt(i) => CellValue::Int(i as i64),
        ValueRef::UBigInt(i) => i64::try_from(i)
            .map(CellValue::Int)
            .unwrap_or_else(|_| CellValue::Text(i.to_string())),
        ValueRef::HugeInt(i) => i64::try_from(i)
            .map(CellValue::Int)
            .unwrap_or_else(|_| CellValue::Text(i.to_string())),
        ValueRef::Float(f) => CellValue::Float(f as f64),
        ValueRef::Double(f) => CellValue::Float(f),
        ValueRef::Decimal(d) => CellValue::Text(d.to_string()),
        ValueRef::Text(s) => CellValue::Text(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => CellValue::Text(format!("<blob:{} bytes>", b.len())),
        ValueRef::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
            .map(CellValue::Date)
            .unwrap_or(CellValue::Null),
        ValueRef::Timestamp(unit, value) => DateTime::<Utc>::from_timestamp_micros(to_micros(unit, value))
            .map(|dt| CellValue::DateTime(dt.naive_utc()))
            .unwrap_or(CellValue::Null),
        ValueRef::Time64(unit, value) => {
            let micros = to_micros(unit, value);
            let secs = micros / 1_000_000;
            CellValue::Text(format!(
                "{:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ))
        }
        other => CellValue::Text(format!("{:?}", other)),
    }
}
