//! Loading delimited tables and validating their schema
//!
//! A [`RawTable`] holds the header and the unparsed rows of one input file, in file order.
//! It is never modified after loading; everything downstream works on derived views.
//!
//! Before any row is interpreted, [`validate`] confirms that the header contains every column
//! a use case needs. [`RawTable::records`] runs that check for a [`Record`] type and then parses
//! each row into it, so the rest of the crate works with named fields instead of string lookups.
//!
//! # Record types
//! - [`FunctionSample`]: `X, Y_target, Y_approx` - function comparison
//! - [`ResultSample`]: `x, target, nop_output, error` - result and error analysis
//! - [`TrajectorySample`]: `Trajectory, Time, X, Y, Theta` - trajectory analysis
//!
//! # Example
//! ```rust
//! use gaviz::table::{RawTable, TrajectorySample};
//!
//! let csv = "Trajectory,Time,X,Y,Theta\n0,0.0,1.0,1.0,0.5\n0,0.1,0.5,0.5,0.2\n";
//! let table = RawTable::from_reader(csv.as_bytes(), b',').unwrap();
//! let rows = table.records::<TrajectorySample>().unwrap();
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[1].x, 0.5);
//! ```
use std::{io::Read, path::Path};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A record type that can be read out of a validated table.
///
/// `COLUMNS` lists the header names the record is deserialized from.
pub trait Record: DeserializeOwned {
    /// Columns that must be present in the header
    const COLUMNS: &'static [&'static str];
}

/// One row of function comparison output
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FunctionSample {
    /// Input value
    #[serde(rename = "X")]
    pub x: f64,

    /// Value of the function being approximated
    #[serde(rename = "Y_target")]
    pub y_target: f64,

    /// Value produced by the approximation
    #[serde(rename = "Y_approx")]
    pub y_approx: f64,
}
impl Record for FunctionSample {
    const COLUMNS: &'static [&'static str] = &["X", "Y_target", "Y_approx"];
}

/// One row of optimiser result output
///
/// `error` is computed upstream as `nop_output - target`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ResultSample {
    /// Input value
    pub x: f64,

    /// Value of the target function
    pub target: f64,

    /// Value produced by the optimised network
    pub nop_output: f64,

    /// Signed error, `nop_output - target`
    pub error: f64,
}
impl Record for ResultSample {
    const COLUMNS: &'static [&'static str] = &["x", "target", "nop_output", "error"];
}

/// One recorded state of a robot trajectory
///
/// Rows of one trajectory appear in recording order.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TrajectorySample {
    /// Trajectory index
    #[serde(rename = "Trajectory")]
    pub trajectory: i64,

    /// Simulation time of the sample
    #[serde(rename = "Time")]
    pub time: f64,

    /// Position x
    #[serde(rename = "X")]
    pub x: f64,

    /// Position y
    #[serde(rename = "Y")]
    pub y: f64,

    /// Heading, in whatever unit the producer used
    #[serde(rename = "Theta")]
    pub theta: f64,
}
impl Record for TrajectorySample {
    const COLUMNS: &'static [&'static str] = &["Trajectory", "Time", "X", "Y", "Theta"];
}

/// An input table: a header row plus unparsed rows in file order
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
}
impl RawTable {
    /// Load a table from a delimited file with a header row.
    ///
    /// # Errors
    /// - [`Error::MissingFile`] if the path does not exist
    /// - [`Error::MalformedRow`] if a row has a different number of fields than the header
    /// - [`Error::Csv`] for any other read failure
    pub fn from_path(path: &Path, delimiter: u8) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }

        let reader = builder(delimiter).from_path(path)?;
        let table = Self::from_csv(reader)?;
        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "Loaded table"
        );
        Ok(table)
    }

    /// Load a table from any reader, for in-memory input.
    ///
    /// # Errors
    /// - [`Error::MalformedRow`] if a row has a different number of fields than the header
    /// - [`Error::Csv`] for any other read failure
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        Self::from_csv(builder(delimiter).from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let rows = reader
            .records()
            .map(|row| row.map_err(malformed_length))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { headers, rows })
    }

    /// Column names, in header order
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.headers.iter().map(ToString::to_string).collect()
    }

    /// Whether the header contains the given column
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Number of data rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validate the header against `R::COLUMNS`, then parse every row into `R`.
    ///
    /// Rows keep their file order. Columns not named by `R` are ignored.
    ///
    /// # Errors
    /// - [`Error::Schema`] if any of `R::COLUMNS` is missing
    /// - [`Error::MalformedRow`] if a required field does not parse
    pub fn records<R: Record>(&self) -> Result<Vec<R>> {
        let table = validate(self, R::COLUMNS)?;
        table
            .rows
            .iter()
            .map(|row| {
                row.deserialize::<R>(Some(&table.headers))
                    .map_err(|e| Error::MalformedRow {
                        line: row.position().map_or(0, csv::Position::line),
                        message: e.to_string(),
                    })
            })
            .collect()
    }
}

/// Confirm that `table` contains every column in `required`.
///
/// Order does not matter, and extra columns are allowed. On success the same table is returned,
/// so callers can chain straight into parsing.
///
/// # Errors
/// Returns [`Error::Schema`] listing the full required set and exactly the missing columns.
pub fn validate<'t>(table: &'t RawTable, required: &[&str]) -> Result<&'t RawTable> {
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !table.has_column(column))
        .map(ToString::to_string)
        .collect();

    if missing.is_empty() {
        return Ok(table);
    }

    Err(Error::Schema {
        required: required.iter().map(ToString::to_string).collect(),
        missing,
        found: table.columns(),
    })
}

fn builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All);
    builder
}

fn malformed_length(error: csv::Error) -> Error {
    match error.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => Error::MalformedRow {
            line: pos.as_ref().map_or(0, csv::Position::line),
            message: format!("expected {expected_len} fields, found {len}"),
        },
        _ => Error::Csv(error),
    }
}
