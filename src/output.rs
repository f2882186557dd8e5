//! Output formatting utilities

use crate::engine::{ComparisonResult, Summary};
use crate::error::Result;
use crate::report::ReportPaths;
use crate::table::Table;
use std::path::Path;

/// Pretty printer for tabcompare output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the summary of a comparison run
    pub fn print_summary(result: &ComparisonResult) {
        let summary = &result.summary;
        println!("📊 Comparison on [{}]", result.primary_keys.join(", "));
        println!("├─ Source rows: {}", summary.source_total);
        println!("├─ Target rows: {}", summary.target_total);
        println!("├─ Key matched rows: {}", summary.key_matched);

        print_count("Data breaks", summary.total_data_breaks);
        print_count("Only in source", summary.only_in_source);
        print_count("Only in target", summary.only_in_target);

        print_count("Source duplicate-key rows", result.source_duplicates.len());
        print_count("Target duplicate-key rows", result.target_duplicates.len());

        println!(
            "└─ Distinct keys: source {}, target {}",
            summary.source_key_duplicate, summary.target_key_duplicate
        );

        if let Some(first) = result.mismatches.first() {
            let key = first
                .key
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!();
            println!("🔍 First data break at key ({}):", key);
            for (i, field) in first.fields.iter().take(5).enumerate() {
                let is_last = i == first.fields.len().min(5) - 1;
                let prefix = if is_last { "└─" } else { "├─" };
                println!("{} {}: '{}' → '{}'", prefix, field.column, field.expected, field.actual);
            }
        }
    }

    /// Print the written artifact paths
    pub fn print_report_paths(paths: &ReportPaths) {
        println!("📁 Reports:");
        let all: Vec<_> = paths.iter().collect();
        for (i, path) in all.iter().enumerate() {
            let prefix = if i == all.len() - 1 { "└─" } else { "├─" };
            println!("{} {}", prefix, path.display());
        }
    }

    /// Print the schema of a single loaded file
    pub fn print_schema(path: &Path, table: &Table) {
        println!("📄 {}", path.display());
        println!("├─ Rows: {}", table.len());
        println!("└─ Columns: {}", table.columns.len());
        for (i, column) in table.columns.iter().enumerate() {
            let prefix = if i == table.columns.len() - 1 { "   └─" } else { "   ├─" };
            println!("{} {}", prefix, column);
        }
    }
}

fn print_count<T: std::fmt::Display + Default + PartialEq>(label: &str, count: T) {
    if count == T::default() {
        println!("├─ ✅ {}: 0", label);
    } else {
        println!("├─ ❌ {}: {}", label, count);
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Summary plus artifact paths
    pub fn format_run(summary: &Summary, paths: &ReportPaths) -> Result<String> {
        let json = serde_json::json!({
            "summary": summary,
            "reports": paths,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
