// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application

/// Reasons the hierarchy/attribute column split could not be inferred.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("No titled column found in header row")]
    NoTitledColumn,

    #[error("Anchor column '{0}' not found")]
    MissingAnchor(&'static str),

    #[error("Hierarchy region is empty (first titled column {start}, anchor {end})")]
    EmptyHierarchy { start: usize, end: usize },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unknown format tag: '{0}' (expected JSON, EDI-X12, EDIFACT or IDOC)")]
    UnknownFormat(String),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Sheet index {0} is out of range")]
    SheetIndexOutOfRange(usize),

    #[error("Could not read sheet '{sheet}': {source}")]
    SheetRead {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Header row {row} is beyond the last used row of sheet '{sheet}'")]
    HeaderOutOfRange { sheet: String, row: usize },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No {0} given (set it in the config file or on the command line)")]
    Missing(&'static str),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workbook loading failed: {0}")]
    Load(#[from] LoadError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
