// src/main.rs
mod detect;
mod extractors;
mod sheet;
mod storage;
mod utils;

use std::path::PathBuf;

use clap::Parser;
use detect::{FormatDetector, HeuristicDetector};
use extractors::{dispatch, dispatch_format};
use sheet::{loader, SheetLocation, SheetRef};
use storage::StorageManager;
use utils::config::{FileConfig, DEFAULT_CONFIG_PATH};
use utils::AppError;

/// Convert a mapping specification spreadsheet into a JSON structure description
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file with `input_path` and `output_path`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Specification workbook (overrides the config file)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip detection and use this format (JSON, EDI-X12, EDIFACT, IDOC)
    #[arg(short, long)]
    format: Option<String>,

    /// Sheet name or 0-based index; skips the sheet scan
    #[arg(long)]
    sheet: Option<String>,

    /// 0-based row holding the column titles (default 0)
    #[arg(long, requires = "sheet")]
    header_row: Option<usize>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (RUST_LOG, else -v count)
    utils::logging::setup_logging(args.verbose);
    tracing::debug!("Starting with args: {:?}", args);

    // 3. Resolve input/output paths
    let (config_path, required) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    let config = FileConfig::load(&config_path, required)?.resolve(args.input.clone(), args.output_dir.clone())?;
    tracing::info!("Input Path: {}", config.input_path.display());
    tracing::info!("Output Path: {}", config.output_path.display());

    // 4. Locate and load the mapping table
    let mut workbook = loader::open_workbook(&config.input_path)?;
    let location = match &args.sheet {
        Some(sheet) => SheetLocation {
            sheet: SheetRef::parse(sheet),
            header_row: args.header_row.unwrap_or(0),
        },
        None => loader::locate_data(&mut workbook),
    };
    let table = loader::load_table(&mut workbook, &location)?;

    tracing::info!("Processing sheet {}, header row {}", location.sheet, location.header_row);
    tracing::info!("Data shape: {:?}", table.shape());
    tracing::info!(
        "Columns found: {:?}",
        table.columns.iter().take(10).collect::<Vec<_>>()
    );

    if table.is_empty() {
        tracing::warn!("Sheet {} has no rows below the header", location.sheet);
    }

    // 5. Detect format (unless given) and extract
    let document = match args.format.as_deref() {
        Some(tag) => dispatch(tag, &table)?,
        None => {
            let format = HeuristicDetector.detect(&table, &config.input_path);
            tracing::info!("Detected format: {}", format);
            dispatch_format(format, &table)
        }
    };
    if document.entry_count() == 0 {
        tracing::warn!("No {} structure entries were extracted", document.format);
    }

    // 6. Save output
    let storage = StorageManager::new(&config.output_path)?;
    let output_file = storage.save_structure(&document)?;
    tracing::info!("Processed and saved: {}", output_file.display());

    Ok(())
}
