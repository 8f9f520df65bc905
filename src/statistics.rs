//! Error metrics and the descriptive statistics behind the error figures
//!
//! # Error Metrics
//! - [`compute_metrics`]: RMSE, MAE and max absolute error of an error column, as a [`Metrics`] snapshot.
//! - [`root_mean_squared_error`], [`mean_absolute_error`], [`max_absolute_error`]: the same reductions one at a time.
//!
//! # Descriptive Statistics
//! - [`cumulative_abs_error`]: running sum of `|error|`, in row order.
//! - [`histogram`]: equal-width bin counts.
//! - [`box_summary`]: quartiles, whiskers and outliers for a box plot.
//! - [`quantile`]: linearly interpolated quantile of sorted data.
//!
//! All functions work in `f64` and never reorder their input unless stated.
//!
//! # Examples
//!
//! ```rust
//! use gaviz::statistics::compute_metrics;
//!
//! let error = [0.5, 0.0, 0.0];
//! let metrics = compute_metrics(&error).unwrap();
//!
//! assert!((metrics.rmse() - 0.2887).abs() < 1e-3);
//! assert!((metrics.mae() - 0.1667).abs() < 1e-3);
//! assert_eq!(metrics.max_abs_error(), 0.5);
//! println!("{metrics}");
//! ```
use crate::error::{Error, Result};

/// Number of histogram bins used by the error distribution figure
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Whisker reach for box plots, as a multiple of the inter-quartile range
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Summary error metrics for one error column
///
/// Computed once by [`compute_metrics`] and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    rmse: f64,
    mae: f64,
    max_abs_error: f64,
}
impl Metrics {
    /// Root mean squared error
    #[must_use]
    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    /// Mean absolute error
    #[must_use]
    pub fn mae(&self) -> f64 {
        self.mae
    }

    /// Largest absolute error
    #[must_use]
    pub fn max_abs_error(&self) -> f64 {
        self.max_abs_error
    }

    /// The metrics as the lines shown in the figure text box
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("RMSE: {:.6}", self.rmse),
            format!("MAE: {:.6}", self.mae),
            format!("Max Error: {:.6}", self.max_abs_error),
        ]
    }
}
impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// Computes RMSE, MAE and max absolute error over an error column in one pass.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// RMSE = √( Σ e_i² / N )
/// MAE  = Σ |e_i| / N
/// MAX  = max |e_i|
/// where
///   e_i = approximation_i - target_i
///   N = number of samples
/// ```
/// </div>
///
/// Accumulates in `f64`. Since `RMSE² - MAE² ` is the variance of `|e|`, `rmse >= mae` always.
///
/// # Errors
/// Returns [`Error::EmptyInput`] if `error` is empty.
pub fn compute_metrics(error: &[f64]) -> Result<Metrics> {
    if error.is_empty() {
        return Err(Error::EmptyInput("error column has no rows"));
    }

    let mut sum_sq = 0.0;
    let mut sum_abs = 0.0;
    let mut max_abs = 0.0_f64;
    for e in error {
        let abs = e.abs();
        sum_sq += e * e;
        sum_abs += abs;
        max_abs = max_abs.max(abs);
    }

    let n = error.len() as f64;
    Ok(Metrics {
        rmse: (sum_sq / n).sqrt(),
        mae: sum_abs / n,
        max_abs_error: max_abs,
    })
}

/// Root mean squared error of an error column, `√(Σ e² / N)`
///
/// Returns `NaN` for an empty column.
#[must_use]
pub fn root_mean_squared_error(error: &[f64]) -> f64 {
    (error.iter().map(|e| e * e).sum::<f64>() / error.len() as f64).sqrt()
}

/// Mean absolute error of an error column, `Σ |e| / N`
///
/// Returns `NaN` for an empty column.
#[must_use]
pub fn mean_absolute_error(error: &[f64]) -> f64 {
    error.iter().map(|e| e.abs()).sum::<f64>() / error.len() as f64
}

/// Largest absolute value in an error column, or `None` if it is empty
#[must_use]
pub fn max_absolute_error(error: &[f64]) -> Option<f64> {
    error.iter().map(|e| e.abs()).reduce(f64::max)
}

/// Running sum of absolute errors, in the order given.
///
/// The result depends on row order, which is why callers must pass the rows as recorded.
///
/// ```rust
/// # use gaviz::statistics::cumulative_abs_error;
/// assert_eq!(cumulative_abs_error(&[1.0, -2.0, 0.5]), vec![1.0, 3.0, 3.5]);
/// ```
#[must_use]
pub fn cumulative_abs_error(error: &[f64]) -> Vec<f64> {
    error
        .iter()
        .scan(0.0, |total, e| {
            *total += e.abs();
            Some(*total)
        })
        .collect()
}

/// One histogram bin, `[start, end)` except for the last bin which is closed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Lower edge
    pub start: f64,
    /// Upper edge
    pub end: f64,
    /// Number of values in the bin
    pub count: usize,
}

/// Counts values into `bins` equal-width bins spanning their range.
///
/// If every value is the same, the bins span `value ± 0.5`.
/// Non-finite values are skipped.
///
/// # Errors
/// Returns [`Error::EmptyInput`] if there are no finite values or `bins` is 0.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<Bin>> {
    let finite = || values.iter().copied().filter(|v| v.is_finite());
    let (Some(mut min), Some(mut max)) = (finite().reduce(f64::min), finite().reduce(f64::max))
    else {
        return Err(Error::EmptyInput("no finite values to bin"));
    };
    if bins == 0 {
        return Err(Error::EmptyInput("histogram needs at least one bin"));
    }

    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in finite() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = ((v - min) / width).floor() as usize;
        counts[index.min(bins - 1)] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect())
}

/// Linearly interpolated quantile of already sorted data.
///
/// `q` is clamped to `0..=1`. Returns `None` for empty input.
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Five-number summary plus outliers, as drawn by a box plot
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Lowest value within `q1 - 1.5 IQR`
    pub whisker_low: f64,
    /// Highest value within `q3 + 1.5 IQR`
    pub whisker_high: f64,
    /// Values beyond the whiskers, in ascending order
    pub outliers: Vec<f64>,
}
impl BoxSummary {
    /// Smallest value drawn for this box, outliers included
    #[must_use]
    pub fn min(&self) -> f64 {
        self.outliers
            .first()
            .map_or(self.whisker_low, |o| o.min(self.whisker_low))
    }

    /// Largest value drawn for this box, outliers included
    #[must_use]
    pub fn max(&self) -> f64 {
        self.outliers
            .last()
            .map_or(self.whisker_high, |o| o.max(self.whisker_high))
    }
}

/// Computes the box plot summary of a set of values.
///
/// Sorts a copy of the input; the caller's order is untouched. Non-finite values are skipped.
///
/// # Errors
/// Returns [`Error::EmptyInput`] if there are no finite values.
pub fn box_summary(values: &[f64]) -> Result<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let (Some(q1), Some(median), Some(q3)) = (
        quantile(&sorted, 0.25),
        quantile(&sorted, 0.5),
        quantile(&sorted, 0.75),
    ) else {
        return Err(Error::EmptyInput("no finite values to summarize"));
    };

    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
    let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

    let inside = || sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
    let whisker_low = inside().next().unwrap_or(q1);
    let whisker_high = inside().last().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    Ok(BoxSummary {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}
