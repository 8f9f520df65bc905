//! End-to-end use cases: load a table, compose its figures, write them out
//!
//! Each use case reads its input once, validates it before anything is drawn, and only then
//! renders. A failure at any step before rendering leaves the output directory untouched.
use std::path::{Path, PathBuf};

use crate::{
    compose,
    error::Result,
    plotting::{render_png, Figure},
    series::{group_trajectories, ErrorSeries},
    statistics::Metrics,
    table::{FunctionSample, RawTable, ResultSample, TrajectorySample},
};

/// Input file read by [`function_comparison`] when none is given
pub const DEFAULT_FUNCTION_INPUT: &str = "function_data.csv";

/// Input file read by [`results`] when none is given
pub const DEFAULT_RESULTS_INPUT: &str = "results.csv";

/// Input file read by [`trajectories`] when none is given
pub const DEFAULT_TRAJECTORY_INPUT: &str = "trajectories.csv";

/// Where figures go and how input is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Directory the PNG files are written to
    pub output_dir: PathBuf,

    /// Field delimiter of the input table
    pub delimiter: u8,
}
impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            delimiter: b',',
        }
    }
}

/// What [`results`] read and wrote
#[derive(Debug, Clone)]
pub struct ResultsReport {
    /// Number of data rows in the input
    pub rows: usize,

    /// Input columns, in header order
    pub columns: Vec<String>,

    /// Error metrics of the whole table
    pub metrics: Metrics,

    /// Files written, in order
    pub outputs: Vec<PathBuf>,
}

/// Plots the target function against its approximation.
///
/// # Errors
/// Fails if the input cannot be loaded or validated, is empty, or the figure cannot be written.
pub fn function_comparison(
    input: &Path,
    target_label: &str,
    options: &RunOptions,
) -> Result<PathBuf> {
    let table = RawTable::from_path(input, options.delimiter)?;
    let samples = table.records::<FunctionSample>()?;
    let figure = compose::function_comparison(&samples, target_label)?;
    render_png(&figure, &options.output_dir)
}

/// Computes error metrics for optimiser results and plots them.
///
/// Always writes the results plot; with `with_analysis` the error analysis figure follows.
/// Both figures are composed before either is written.
///
/// # Errors
/// Fails if the input cannot be loaded or validated, is empty, or a figure cannot be written.
pub fn results(
    input: &Path,
    target_label: &str,
    with_analysis: bool,
    options: &RunOptions,
) -> Result<ResultsReport> {
    let table = RawTable::from_path(input, options.delimiter)?;
    let samples = table.records::<ResultSample>()?;
    let series = ErrorSeries::from_results(&samples);
    let metrics = series.metrics()?;

    let mut figures: Vec<Figure> = vec![compose::results_plot(&series, &metrics, target_label)?];
    if with_analysis {
        figures.push(compose::error_analysis(&series)?);
    }

    let outputs = figures
        .iter()
        .map(|figure| render_png(figure, &options.output_dir))
        .collect::<Result<Vec<_>>>()?;

    Ok(ResultsReport {
        rows: table.len(),
        columns: table.columns(),
        metrics,
        outputs,
    })
}

/// Plots every trajectory in the input, heading for `goal`.
///
/// # Errors
/// Fails if the input cannot be loaded or validated, has no rows, or the figure cannot be
/// written.
pub fn trajectories(input: &Path, goal: (f64, f64), options: &RunOptions) -> Result<PathBuf> {
    let table = RawTable::from_path(input, options.delimiter)?;
    let samples = table.records::<TrajectorySample>()?;
    let trajectories = group_trajectories(&samples);
    let figure = compose::trajectory_overlay(&trajectories, goal)?;
    render_png(&figure, &options.output_dir)
}
