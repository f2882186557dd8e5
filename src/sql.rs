//! SQL text construction for the comparison queries.
//!
//! Every identifier passes through [`quote_ident`] and every literal through
//! [`quote_literal`], so caller-supplied key, column, table names and paths can
//! never change the shape of a statement.

use std::path::Path;

/// Quote an identifier, doubling embedded double quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal, doubling embedded single quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn path_literal(path: &Path) -> String {
    quote_literal(&path.to_string_lossy())
}

/// Equality join between two aliased tables over an ordered key set.
///
/// Every key column is compared pairwise and all must match; a NULL key on
/// either side never matches.
#[derive(Debug, Clone)]
pub struct KeyJoin {
    left_table: String,
    right_table: String,
    keys: Vec<String>,
}

impl KeyJoin {
    pub const LEFT: &'static str = "a";
    pub const RIGHT: &'static str = "b";

    pub fn new(left_table: &str, right_table: &str, keys: &[String]) -> Self {
        Self {
            left_table: left_table.to_string(),
            right_table: right_table.to_string(),
            keys: keys.to_vec(),
        }
    }

    /// Same join with the driving side swapped
    pub fn reversed(&self) -> Self {
        Self {
            left_table: self.right_table.clone(),
            right_table: self.left_table.clone(),
            keys: self.keys.clone(),
        }
    }

    /// `a."k1" = b."k1" AND a."k2" = b."k2"`
    pub fn condition(&self) -> String {
        key_condition(&self.keys, Self::LEFT, Self::RIGHT)
    }

    fn from_left_join(&self) -> String {
        format!(
            "FROM {} AS {} LEFT JOIN {} AS {} ON ({})",
            quote_ident(&self.left_table),
            Self::LEFT,
            quote_ident(&self.right_table),
            Self::RIGHT,
            self.condition()
        )
    }

    /// All left rows, each followed by the matching right columns (NULLs when unmatched)
    pub fn left_join_all(&self) -> String {
        format!(
            "SELECT {l}.*, {r}.* {from} ORDER BY {order}, {r}.rowid",
            l = Self::LEFT,
            r = Self::RIGHT,
            from = self.from_left_join(),
            order = key_order(&self.keys, Self::LEFT)
        )
    }

    /// Left rows whose key combination has no counterpart on the right
    pub fn left_anti(&self) -> String {
        format!(
            "SELECT {l}.* {from} WHERE {r}.{k} IS NULL ORDER BY {order}",
            l = Self::LEFT,
            r = Self::RIGHT,
            from = self.from_left_join(),
            k = quote_ident(&self.keys[0]),
            order = key_order(&self.keys, Self::LEFT)
        )
    }

    /// Number of row pairs produced by the inner equality join
    pub fn inner_count(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} AS {} JOIN {} AS {} ON ({})",
            quote_ident(&self.left_table),
            Self::LEFT,
            quote_ident(&self.right_table),
            Self::RIGHT,
            self.condition()
        )
    }
}

fn key_condition(keys: &[String], left: &str, right: &str) -> String {
    keys.iter()
        .map(|k| {
            let k = quote_ident(k);
            format!("{}.{} = {}.{}", left, k, right, k)
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Key columns then insertion order, so reports are stable across runs
fn key_order(keys: &[String], alias: &str) -> String {
    let mut parts: Vec<String> = keys
        .iter()
        .map(|k| format!("{}.{}", alias, quote_ident(k)))
        .collect();
    parts.push(format!("{}.rowid", alias));
    parts.join(", ")
}

/// Full rows of `table` whose key combination occurs more than once
pub fn duplicate_key_rows(table: &str, keys: &[String]) -> String {
    let key_list = keys
        .iter()
        .map(|k| quote_ident(k))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {l}.* FROM {t} AS {l} JOIN (SELECT {keys} FROM {t} GROUP BY {keys} HAVING COUNT(*) > 1) AS {r} ON ({cond}) ORDER BY {order}",
        l = KeyJoin::LEFT,
        r = KeyJoin::RIGHT,
        t = quote_ident(table),
        keys = key_list,
        cond = key_condition(keys, KeyJoin::LEFT, KeyJoin::RIGHT),
        order = key_order(keys, KeyJoin::LEFT)
    )
}

/// Count of distinct key combinations; rows with a NULL key component are not counted
pub fn distinct_key_count(table: &str, keys: &[String]) -> String {
    let key_list = keys
        .iter()
        .map(|k| quote_ident(k))
        .collect::<Vec<_>>()
        .join(", ");
    let not_null = keys
        .iter()
        .map(|k| format!("{} IS NOT NULL", quote_ident(k)))
        .collect::<Vec<_>>()
        .join(" AND ");
    format!(
        "SELECT COUNT(*) FROM (SELECT DISTINCT {} FROM {} WHERE {})",
        key_list,
        quote_ident(table),
        not_null
    )
}

/// Group a DuckDB column type into the family that decides whether two key
/// columns can be joined. Integer widths join with each other, as do the
/// floating and decimal types; every other type only joins with itself.
pub fn type_family(sql_type: &str) -> String {
    let base = sql_type
        .split('(')
        .next()
        .unwrap_or(sql_type)
        .trim()
        .to_uppercase();
    match base.as_str() {
        "TINYINT" | "SMALLINT" | "INTEGER" | "BIGINT" | "HUGEINT" | "UTINYINT" | "USMALLINT"
        | "UINTEGER" | "UBIGINT" | "UHUGEINT" => "INTEGER".to_string(),
        "FLOAT" | "DOUBLE" | "DECIMAL" => "FLOATING".to_string(),
        _ => base,
    }
}

pub fn row_count(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", quote_ident(table))
}
