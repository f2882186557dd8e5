//! Command implementations for tabcompare CLI

use crate::adapters;
use crate::cli::{Commands, OutputFormat};
use crate::config::CompareConfig;
use crate::engine::ComparisonSession;
use crate::error::{Result, TabcompareError};
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::ProgressReporter;
use crate::report::ReportWriter;
use crate::store::Store;
use std::path::{Path, PathBuf};

/// Execute a command
pub fn execute_command(command: Commands, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => CompareConfig::from_file(path)?,
        None => CompareConfig::default(),
    };

    match command {
        Commands::Compare {
            source,
            target,
            keys,
            mapping,
            output_dir,
            json,
            quiet,
        } => compare_command(
            config,
            &source,
            &target,
            &keys,
            mapping.as_deref(),
            output_dir,
            json,
            quiet,
        ),
        Commands::Schema {
            input,
            mapping,
            format,
        } => schema_command(config, &input, mapping.as_deref(), &format),
    }
}

#[allow(clippy::too_many_arguments)]
fn compare_command(
    mut config: CompareConfig,
    source: &Path,
    target: &Path,
    keys: &[String],
    mapping: Option<&Path>,
    output_dir: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let mut progress = if quiet || json {
        ProgressReporter::new_minimal()
    } else {
        ProgressReporter::new_for_compare()
    };

    let writer = ReportWriter::new(config.output_dir.clone())?;
    let mut session = ComparisonSession::open(config)?;

    progress.update_load(&format!("Loading {}...", source.display()));
    session.load_source(source, mapping)?;
    progress.update_load(&format!("Loading {}...", target.display()));
    session.load_target(target, mapping)?;
    progress.finish_load("Loaded source and target");

    let result = session.run(keys)?;
    drop(session);
    progress.finish_compare(&format!(
        "Compared: {} data breaks",
        result.summary.total_data_breaks
    ));

    let paths = writer.write_all(&result)?;
    progress.finish_write(&format!("Reports written to {}", writer.output_dir().display()));
    log::info!("Comparison finished in {:.3?}", progress.elapsed());

    if json {
        println!("{}", JsonFormatter::format_run(&result.summary, &paths)?);
    } else {
        PrettyPrinter::print_summary(&result);
        println!();
        PrettyPrinter::print_report_paths(&paths);
    }

    Ok(())
}

fn schema_command(
    config: CompareConfig,
    input: &Path,
    mapping: Option<&Path>,
    format: &str,
) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(TabcompareError::invalid_input)?;

    let mut store = Store::open(&config.store)?;
    adapters::load(&mut store, input, &config.source_table, mapping, &config)?;
    let table = store.fetch_table(&config.source_table)?;

    match format {
        OutputFormat::Pretty => PrettyPrinter::print_schema(input, &table),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "path": input,
                "row_count": table.len(),
                "columns": table.columns,
            });
            println!("{}", JsonFormatter::format(&json)?);
        }
    }

    Ok(())
}
