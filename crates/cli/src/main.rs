//! # keyfill-cli
//!
//! Command-line front end for the keyfill merge engine.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use keyfill_merge::{
    inspect_workbook, merge_workbook, MergeOutcome, MergeStatus, SheetSelection, WorkbookInfo,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default name of the merged workbook.
const DEFAULT_OUTPUT: &str = "processed_file.xlsx";

/// keyfill - fill one sheet from another by matching keys
#[derive(Parser)]
#[command(name = "keyfill")]
#[command(
    author,
    version,
    about = "Match target column I against source column A and copy D..J into Q..W",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format (text, json)
    #[arg(short = 'f', long = "format", global = true, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the sheets of a workbook and the default target/source
    Sheets {
        /// Workbook to inspect (.xlsx)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Merge the source sheet into the target sheet
    Merge {
        /// Workbook to process (.xlsx)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the merged workbook
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Sheet receiving the copied columns
        #[arg(short, long)]
        target: Option<String>,

        /// Sheet supplying the copied columns
        #[arg(short, long)]
        source: Option<String>,
    },
}

/// Output format for results.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Text,
    /// JSON output
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    match cli.command {
        Command::Sheets { file } => {
            let info = run_sheets(&file)?;
            print_sheets(&info, cli.format)
        }
        Command::Merge {
            file,
            output,
            target,
            source,
        } => {
            let selection = SheetSelection { target, source };
            let outcome = run_merge(&file, &output, &selection)?;
            print_outcome(&outcome, &output, cli.format)
        }
    }
}

fn read_input(file: &Path) -> Result<Vec<u8>> {
    std::fs::read(file).with_context(|| format!("Failed to read file: {}", file.display()))
}

/// Inspect a workbook's sheets.
fn run_sheets(file: &Path) -> Result<WorkbookInfo> {
    let bytes = read_input(file)?;
    inspect_workbook(&bytes).with_context(|| format!("Failed to inspect {}", file.display()))
}

/// Merge a workbook and write the result to `output`.
fn run_merge(file: &Path, output: &Path, selection: &SheetSelection) -> Result<MergeOutcome> {
    let bytes = read_input(file)?;
    let outcome = merge_workbook(&bytes, selection)
        .with_context(|| format!("Failed to merge {}", file.display()))?;
    std::fs::write(output, &outcome.bytes)
        .with_context(|| format!("Failed to write file: {}", output.display()))?;
    info!(path = %output.display(), bytes = outcome.bytes.len(), "wrote merged workbook");
    Ok(outcome)
}

fn print_sheets(info: &WorkbookInfo, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(info)?),
        OutputFormat::Text => {
            for name in &info.sheets {
                let role = if info.default_target.as_deref() == Some(name.as_str()) {
                    "  (default target)".green().to_string()
                } else if info.default_source.as_deref() == Some(name.as_str()) {
                    "  (default source)".cyan().to_string()
                } else {
                    String::new()
                };
                println!("{name}{role}");
            }
        }
    }
    Ok(())
}

fn print_outcome(outcome: &MergeOutcome, output: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "output": output.display().to_string(),
                "target": outcome.sheets.target,
                "source": outcome.sheets.source,
                "status": outcome.status,
                "stats": outcome.stats,
                "message": outcome.message(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            match outcome.status {
                MergeStatus::Matched => println!("{}", outcome.message().green().bold()),
                MergeStatus::NoMatches => {
                    println!("{} {}", "Warning:".yellow().bold(), outcome.message());
                }
            }
            println!("Wrote {}", output.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfill_sheet::{Book, CellValue, Sheet};
    use tempfile::tempdir;

    fn write_input(path: &Path) {
        let mut target_row = vec![CellValue::Null; 9];
        target_row[8] = CellValue::from("K");
        let mut source_row = vec![CellValue::from("K")];
        source_row.extend((1..10).map(|i| CellValue::from(format!("v{i}"))));

        let mut book = Book::new();
        book.add_sheet(
            "Sheet1",
            Sheet::from_header_and_rows("Sheet1", vec![CellValue::from("h"); 9], vec![target_row]),
        )
        .unwrap();
        book.add_sheet(
            "Sheet2",
            Sheet::from_header_and_rows("Sheet2", vec![CellValue::from("h"); 10], vec![source_row]),
        )
        .unwrap();
        book.save_as_xlsx(path).unwrap();
    }

    #[test]
    fn test_parse_merge_args() {
        let cli = Cli::try_parse_from([
            "keyfill", "merge", "in.xlsx", "-t", "Orders", "-s", "Lookup", "-o", "out.xlsx",
        ])
        .unwrap();
        match cli.command {
            Command::Merge {
                file,
                output,
                target,
                source,
            } => {
                assert_eq!(file, PathBuf::from("in.xlsx"));
                assert_eq!(output, PathBuf::from("out.xlsx"));
                assert_eq!(target.as_deref(), Some("Orders"));
                assert_eq!(source.as_deref(), Some("Lookup"));
            }
            Command::Sheets { .. } => panic!("expected merge command"),
        }
    }

    #[test]
    fn test_merge_defaults_output_name() {
        let cli = Cli::try_parse_from(["keyfill", "merge", "in.xlsx"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Merge { ref output, target: None, source: None, .. }
                if output == Path::new(DEFAULT_OUTPUT)
        ));
    }

    #[test]
    fn test_run_sheets() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.xlsx");
        write_input(&input);

        let info = run_sheets(&input).unwrap();
        assert_eq!(info.sheets, vec!["Sheet1".to_string(), "Sheet2".to_string()]);
        assert_eq!(info.default_target.as_deref(), Some("Sheet1"));
    }

    #[test]
    fn test_run_merge_writes_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.xlsx");
        let output = dir.path().join("out.xlsx");
        write_input(&input);

        let outcome = run_merge(&input, &output, &SheetSelection::default()).unwrap();
        assert_eq!(outcome.matched_rows(), 1);

        let merged = Book::from_xlsx(&output).unwrap();
        let target = merged.get_sheet("Sheet1").unwrap();
        assert_eq!(target.get(0, 16).unwrap(), &CellValue::from("v3"));
    }

    #[test]
    fn test_run_merge_missing_file() {
        let dir = tempdir().unwrap();
        let err = run_merge(
            &dir.path().join("missing.xlsx"),
            &dir.path().join("out.xlsx"),
            &SheetSelection::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
        assert!(!dir.path().join("out.xlsx").exists());
    }
}
