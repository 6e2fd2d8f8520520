use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the roomie-graph pipeline.
#[derive(Error, Debug)]
pub enum RoomieError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A spreadsheet could not be decoded at the file-format level.
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    /// The requested sheet does not exist in the workbook.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The input grid is not rectangular.
    #[error("Malformed grid at row {row}: expected {expected} columns, found {found}")]
    Structural {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A period column's year/month header could not be resolved.
    #[error("Unresolvable period header in column {column}: {detail}")]
    MissingHeader { column: usize, detail: String },

    /// The input yielded zero residents.
    #[error("No residents extracted from input")]
    EmptyInput,

    /// A JSON document could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the roomie-graph crates.
pub type Result<T> = std::result::Result<T, RoomieError>;
