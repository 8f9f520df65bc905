//! Error types for loading tables and rendering figures
//!
//! Every failure is terminal for the current invocation: nothing is retried,
//! skipped, or partially drawn.
use std::path::PathBuf;

/// Errors that can occur between reading an input table and writing a figure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file does not exist.
    #[error("{} not found. Please ensure the file exists in the working directory", .0.display())]
    MissingFile(PathBuf),

    /// One or more required columns are absent from the table header.
    #[error(
        "Input must contain columns '{}'; missing: '{}' (found: '{}')",
        .required.join(","),
        .missing.join(","),
        .found.join(",")
    )]
    Schema {
        /// Full set of columns the use case needs
        required: Vec<String>,
        /// The subset of `required` that was not in the header
        missing: Vec<String>,
        /// Columns actually present in the header
        found: Vec<String>,
    },

    /// There is nothing to compute or draw.
    ///
    /// Contains a description of what was empty.
    #[error("No data available: {0}")]
    EmptyInput(&'static str),

    /// A row could not be parsed into the expected numeric fields.
    #[error("Malformed row at line {line}: {message}")]
    MalformedRow {
        /// 1-based line number in the input, or 0 if unknown
        line: u64,
        /// What went wrong with the row
        message: String,
    },

    /// The table could not be read.
    #[error("Failed to read table: {0}")]
    Csv(#[from] csv::Error),

    /// The output directory could not be prepared.
    #[error("Failed to prepare output directory {}: {source}", .path.display())]
    Io {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying IO failure
        source: std::io::Error,
    },

    /// The rendering backend failed to draw or encode the figure.
    #[error("Failed to render figure: {0}")]
    Render(String),
}

/// Result type for table loading, metrics and rendering
pub type Result<T> = std::result::Result<T, Error>;
