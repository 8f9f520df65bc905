//! Derived views over validated records
//!
//! - [`Series`] / [`group_by_id`]: rows sharing one identifier, in recording order
//! - [`ErrorSeries`]: parallel target/approximation/error columns for the error figures
//!
//! Neither copies or reorders the underlying records.
use std::collections::BTreeMap;

use crate::{
    error::Result,
    statistics::{compute_metrics, Metrics},
    table::{FunctionSample, ResultSample, TrajectorySample},
};

/// Relative tolerance used when checking an upstream error column against `approx - target`
pub const ERROR_COLUMN_TOLERANCE: f64 = 1e-6;

/// Rows sharing one identifier, in the order they were recorded.
///
/// The first row is the start state and the last row is the end state. That is decided by
/// position only, never by the values in the rows.
///
/// A series always has at least one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<'a, K, R> {
    id: K,
    rows: Vec<&'a R>,
}
impl<'a, K: Copy, R> Series<'a, K, R> {
    /// Identifier shared by every row of the series
    #[must_use]
    pub fn id(&self) -> K {
        self.id
    }

    /// Rows in recording order
    #[must_use]
    pub fn rows(&self) -> &[&'a R] {
        &self.rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First recorded row
    #[must_use]
    pub fn start(&self) -> &'a R {
        // Non-empty by construction in `group_by_id`
        self.rows[0]
    }

    /// Last recorded row. Same as [`Series::start`] for a single-row series.
    #[must_use]
    pub fn end(&self) -> &'a R {
        self.rows[self.rows.len() - 1]
    }
}

/// A robot trajectory: the samples of one `Trajectory` index
pub type Trajectory<'a> = Series<'a, i64, TrajectorySample>;

impl Trajectory<'_> {
    /// Path of the trajectory as `(x, y)` points
    #[must_use]
    pub fn path(&self) -> Vec<(f64, f64)> {
        self.rows.iter().map(|s| (s.x, s.y)).collect()
    }

    /// Position of the start state
    #[must_use]
    pub fn start_point(&self) -> (f64, f64) {
        (self.start().x, self.start().y)
    }

    /// Position of the end state
    #[must_use]
    pub fn end_point(&self) -> (f64, f64) {
        (self.end().x, self.end().y)
    }
}

/// Partitions rows by the identifier returned by `key`.
///
/// - Identifiers are discovered from the rows; there is no fixed count.
/// - Output is ordered by ascending identifier.
/// - Within a series, rows keep their input order.
///
/// ```rust
/// # use gaviz::series::group_by_id;
/// let rows = [3, 3, 1, 1, 1, 2];
/// let groups = group_by_id(&rows, |id| *id);
/// let shape: Vec<_> = groups.iter().map(|s| (s.id(), s.len())).collect();
/// assert_eq!(shape, [(1, 3), (2, 1), (3, 2)]);
/// ```
pub fn group_by_id<'a, K, R>(rows: &'a [R], key: impl Fn(&R) -> K) -> Vec<Series<'a, K, R>>
where
    K: Ord + Copy,
{
    let mut groups: BTreeMap<K, Vec<&'a R>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(id, rows)| Series { id, rows })
        .collect()
}

/// Groups trajectory samples by their `Trajectory` column
#[must_use]
pub fn group_trajectories(samples: &[TrajectorySample]) -> Vec<Trajectory<'_>> {
    let trajectories = group_by_id(samples, |s| s.trajectory);
    tracing::debug!(
        samples = samples.len(),
        trajectories = trajectories.len(),
        "Grouped trajectories"
    );
    trajectories
}

/// Parallel columns of inputs, targets, approximations and their difference
///
/// `error[i] = approximation[i] - target[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorSeries {
    x: Vec<f64>,
    target: Vec<f64>,
    approximation: Vec<f64>,
    error: Vec<f64>,
}
impl ErrorSeries {
    /// Builds the series from function comparison samples, deriving the error column
    #[must_use]
    pub fn from_function_samples(samples: &[FunctionSample]) -> Self {
        let mut series = Self::with_capacity(samples.len());
        for s in samples {
            series.push(s.x, s.y_target, s.y_approx, s.y_approx - s.y_target);
        }
        series
    }

    /// Builds the series from optimiser results, keeping the upstream error column.
    ///
    /// Rows whose error differs from `nop_output - target` by more than
    /// [`ERROR_COLUMN_TOLERANCE`] (relative) are logged as a warning.
    #[must_use]
    pub fn from_results(samples: &[ResultSample]) -> Self {
        let mut series = Self::with_capacity(samples.len());
        let mut mismatched = 0usize;
        for s in samples {
            let derived = s.nop_output - s.target;
            let scale = 1f64.max(s.target.abs()).max(s.nop_output.abs());
            if (derived - s.error).abs() > ERROR_COLUMN_TOLERANCE * scale {
                mismatched += 1;
            }
            series.push(s.x, s.target, s.nop_output, s.error);
        }

        if mismatched > 0 {
            tracing::warn!(
                mismatched,
                rows = samples.len(),
                "Error column does not match nop_output - target"
            );
        }
        series
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            target: Vec::with_capacity(n),
            approximation: Vec::with_capacity(n),
            error: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, x: f64, target: f64, approximation: f64, error: f64) {
        self.x.push(x);
        self.target.push(target);
        self.approximation.push(approximation);
        self.error.push(error);
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True if there are no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Input values
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Target values
    #[must_use]
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Approximated values
    #[must_use]
    pub fn approximation(&self) -> &[f64] {
        &self.approximation
    }

    /// Signed errors
    #[must_use]
    pub fn error(&self) -> &[f64] {
        &self.error
    }

    /// Absolute errors, in row order
    #[must_use]
    pub fn abs_error(&self) -> Vec<f64> {
        self.error.iter().map(|e| e.abs()).collect()
    }

    /// `(x, target)` points
    #[must_use]
    pub fn target_points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.target.iter().copied()).collect()
    }

    /// `(x, approximation)` points
    #[must_use]
    pub fn approximation_points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .copied()
            .zip(self.approximation.iter().copied())
            .collect()
    }

    /// Summary metrics of the error column
    ///
    /// # Errors
    /// Returns [`crate::Error::EmptyInput`] if the series is empty.
    pub fn metrics(&self) -> Result<Metrics> {
        compute_metrics(&self.error)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{assert_all_close, assert_close};

    fn sample(trajectory: i64, time: f64) -> TrajectorySample {
        TrajectorySample {
            trajectory,
            time,
            x: time * 2.0,
            y: -time,
            theta: 0.0,
        }
    }

    #[test]
    fn groups_sorted_by_id_with_row_order_kept() {
        let rows = [
            sample(3, 0.0),
            sample(3, 1.0),
            sample(1, 0.0),
            sample(1, 1.0),
            sample(1, 2.0),
            sample(2, 0.0),
        ];
        let groups = group_trajectories(&rows);
        let shape: Vec<_> = groups.iter().map(|s| (s.id(), s.len())).collect();
        assert_eq!(shape, [(1, 3), (2, 1), (3, 2)]);

        let times: Vec<f64> = groups[0].rows().iter().map(|s| s.time).collect();
        assert_eq!(times, [0.0, 1.0, 2.0]);
        assert!(std::ptr::eq(groups[2].start(), &rows[0]));
        assert!(std::ptr::eq(groups[2].end(), &rows[1]));
    }

    #[test]
    fn start_and_end_come_from_position_not_value() {
        // Time runs backwards and x is not monotone, the markers must still follow row order
        let rows = [
            TrajectorySample {
                trajectory: 0,
                time: 5.0,
                x: 1.0,
                y: 1.0,
                theta: 0.0,
            },
            TrajectorySample {
                trajectory: 0,
                time: 1.0,
                x: -4.0,
                y: 9.0,
                theta: 0.0,
            },
            TrajectorySample {
                trajectory: 0,
                time: 3.0,
                x: 2.0,
                y: 0.5,
                theta: 0.0,
            },
        ];
        let groups = group_trajectories(&rows);
        assert_eq!(groups[0].start_point(), (1.0, 1.0));
        assert_eq!(groups[0].end_point(), (2.0, 0.5));
        assert_eq!(groups[0].path(), vec![(1.0, 1.0), (-4.0, 9.0), (2.0, 0.5)]);
    }

    #[test]
    fn single_row_series_starts_where_it_ends() {
        let rows = [sample(7, 0.5)];
        let groups = group_trajectories(&rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].start_point(), groups[0].end_point());
    }

    #[test]
    fn ids_are_discovered_not_fixed() {
        let rows: Vec<_> = (0..40).rev().map(|id| sample(id, 0.0)).collect();
        let groups = group_trajectories(&rows);
        assert_eq!(groups.len(), 40);
        assert!(groups.windows(2).all(|w| w[0].id() < w[1].id()));
        assert!(group_trajectories(&[]).is_empty());
    }

    #[test]
    fn error_series_from_function_samples() {
        let samples = [
            FunctionSample {
                x: 0.0,
                y_target: 0.0,
                y_approx: 0.5,
            },
            FunctionSample {
                x: 1.0,
                y_target: 1.0,
                y_approx: 1.0,
            },
            FunctionSample {
                x: 2.0,
                y_target: 0.0,
                y_approx: 0.0,
            },
        ];
        let series = ErrorSeries::from_function_samples(&samples);
        assert_all_close!(series.error(), [0.5, 0.0, 0.0]);

        let metrics = series.metrics().unwrap();
        assert_close!(metrics.rmse(), 0.2887, tol = 1e-3);
        assert_close!(metrics.mae(), 0.1667, tol = 1e-3);
        assert_eq!(metrics.max_abs_error(), 0.5);
    }

    #[test]
    fn error_series_keeps_upstream_error() {
        let samples = [
            ResultSample {
                x: 0.0,
                target: 1.0,
                nop_output: 1.5,
                error: 0.5,
            },
            ResultSample {
                x: 0.1,
                target: 2.0,
                nop_output: 1.0,
                error: -1.0,
            },
        ];
        let series = ErrorSeries::from_results(&samples);
        assert_eq!(series.len(), 2);
        assert_eq!(series.error(), &[0.5, -1.0]);
        assert_eq!(series.abs_error(), vec![0.5, 1.0]);
        assert_eq!(series.target_points(), vec![(0.0, 1.0), (0.1, 2.0)]);
        assert_eq!(series.approximation_points(), vec![(0.0, 1.5), (0.1, 1.0)]);
    }

    #[test]
    fn empty_error_series_has_no_metrics() {
        let series = ErrorSeries::from_results(&[]);
        assert!(series.is_empty());
        assert!(series.metrics().is_err());
    }
}
