//! PartImport CLI - import spreadsheet parts lists into drawings from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use partimport::host::memory::MemoryDrawing;
use partimport::{
    Entry, FailurePolicy, ImportError, ImportOptions, ImportReport, MessageSink, PartImportCore,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "partimport")]
#[command(about = "Spreadsheet parts list to drawing symbol import tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging (debug level) on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the valid entries of a parts list
    Entries {
        /// Path to .xlsx, .xls, .ods or .csv parts list
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Worksheet name (default: first worksheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Import a parts list into a JSON drawing
    Import {
        /// Path to .xlsx, .xls, .ods or .csv parts list
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Drawing to import into
        #[arg(short, long, value_name = "DRAWING")]
        drawing: PathBuf,

        /// Where to write the updated drawing (default: in place)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// JSON file with import options
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Worksheet name (default: first worksheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Stop at the first entry that cannot be imported
        #[arg(long)]
        abort_on_error: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

/// User-visible messages go to stderr, one line each.
struct StderrSink;

impl MessageSink for StderrSink {
    fn write_message(&mut self, line: &str) {
        eprintln!("{}", line);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Entries {
            file,
            sheet,
            format,
        } => handle_entries(&file, sheet, format),
        Commands::Import {
            file,
            drawing,
            output,
            config,
            sheet,
            abort_on_error,
            format,
        } => handle_import(
            &file,
            &drawing,
            output.as_deref(),
            config.as_deref(),
            sheet,
            abort_on_error,
            format,
        ),
    };

    process::exit(exit_code);
}

fn handle_entries(file: &Path, sheet: Option<String>, format: OutputFormat) -> i32 {
    let options = ImportOptions {
        worksheet: sheet,
        ..ImportOptions::default()
    };

    match PartImportCore::read_entries(file, &options) {
        Ok(parsed) => {
            match format {
                OutputFormat::Human => output_entries_human(file, &parsed.entries, parsed.rows_skipped),
                OutputFormat::Json => output_entries_json(file, &parsed.entries, parsed.rows_skipped),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn load_options(
    config: Option<&Path>,
    sheet: Option<String>,
    abort_on_error: bool,
) -> Result<ImportOptions, ImportError> {
    let mut options = match config {
        Some(path) => ImportOptions::from_file(path)?,
        None => ImportOptions::default(),
    };
    if sheet.is_some() {
        options.worksheet = sheet;
    }
    if abort_on_error {
        options.on_failure = FailurePolicy::Abort;
    }
    Ok(options)
}

fn handle_import(
    file: &Path,
    drawing_path: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    sheet: Option<String>,
    abort_on_error: bool,
    format: OutputFormat,
) -> i32 {
    let options = match load_options(config, sheet, abort_on_error) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    tracing::debug!("Import options: {:?}", options);

    let mut drawing = match MemoryDrawing::load(drawing_path) {
        Ok(drawing) => drawing,
        Err(e) => {
            eprintln!("Error: cannot load drawing {}: {}", drawing_path.display(), e);
            return 1;
        }
    };

    let result = PartImportCore::import_file(file, &mut drawing, &options, &mut StderrSink);

    // Entries placed before an abort are kept, so only an unreadable
    // spreadsheet leaves the drawing unwritten
    if !matches!(result, Err(ImportError::Open(_))) {
        let target = output.unwrap_or(drawing_path);
        if let Err(e) = drawing.save(target) {
            eprintln!("Error: cannot write drawing {}: {}", target.display(), e);
            return 1;
        }
    }

    match result {
        Ok(report) => {
            match format {
                OutputFormat::Human => output_report_human(&report),
                OutputFormat::Json => output_report_json(&report),
            }
            if report.has_failures() {
                2
            } else {
                0
            }
        }
        // The sink has already reported the failing entry
        Err(ImportError::Entry { .. }) => 1,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_entries_human(file: &Path, entries: &[Entry], skipped: usize) {
    println!("\nFile: {}", file.display());
    println!("{}", "─".repeat(60));

    if entries.is_empty() {
        println!("  No valid entries found");
    }
    for entry in entries {
        println!(
            "  {:<12} {:<20} {:<10} ({}, {})",
            entry.symbol,
            entry.part_number,
            entry.manufacturer,
            entry.x(),
            entry.y()
        );
        if !entry.description1.is_empty() {
            println!("      {}", entry.description1);
        }
    }

    println!("\n  Summary:");
    println!("    Valid:   {}", entries.len());
    println!("    Skipped: {}", skipped);
}

fn output_entries_json(file: &Path, entries: &[Entry], skipped: usize) {
    let output = serde_json::json!({
        "file": file.display().to_string(),
        "entries": entries,
        "summary": {
            "valid": entries.len(),
            "skipped": skipped,
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn output_report_human(report: &ImportReport) {
    if let Some(ref source) = report.source {
        println!("\nFile: {}", source.display());
    }
    println!("{}", "─".repeat(60));

    if !report.placed.is_empty() {
        println!("\n  PLACED:");
        for placed in &report.placed {
            println!(
                "    - {} {} at ({}, {}) [{}]",
                placed.symbol, placed.part_number, placed.position.x, placed.position.y, placed.handle
            );
        }
    }
    if !report.failures.is_empty() {
        println!("\n  FAILED:");
        for failure in &report.failures {
            println!("    - {}", failure.reason);
        }
    }

    println!("\n  Summary:");
    println!("    Rows read: {}", report.rows_read);
    println!("    Skipped:   {}", report.rows_skipped);
    println!("    Placed:    {}", report.placed.len());
    println!("    Failed:    {}", report.failures.len());
}

fn output_report_json(report: &ImportReport) {
    match serde_json::to_string_pretty(report) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}
