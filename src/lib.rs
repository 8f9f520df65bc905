//! # gaviz
//! ## Comparison plots for optimiser output
//!
//! Upstream simulation and optimisation programs dump their results as delimited tables:
//! a target function next to its approximation, or a set of robot trajectories driving
//! towards a goal. This crate turns those tables into PNG figures with a few summary
//! error metrics attached.
//!
//! The pipeline only flows one way:
//! - [`table::RawTable`] is loaded once, checked by [`table::validate`] and converted to typed records
//! - [`series`] groups rows into trajectories, or pairs targets and approximations into an [`series::ErrorSeries`]
//! - [`statistics::compute_metrics`] reduces the error column to RMSE, MAE and max error
//! - [`palette::assign_colors`] hands out one color per trajectory, scaling the palette with the count
//! - [`compose`] builds a [`plotting::Figure`] out of plain data
//! - [`plotting::render_png`] draws that figure with the `plotters` backend and writes the file
//!
//! ```rust
//! use gaviz::{compose, series::ErrorSeries, table::{FunctionSample, RawTable}};
//!
//! let csv = "X,Y_target,Y_approx\n0.0,0.0,0.5\n1.0,1.0,1.0\n2.0,0.0,0.0\n";
//! let table = RawTable::from_reader(csv.as_bytes(), b',').unwrap();
//! let samples = table.records::<FunctionSample>().unwrap();
//!
//! let metrics = ErrorSeries::from_function_samples(&samples).metrics().unwrap();
//! assert!((metrics.rmse() - 0.2887).abs() < 1e-3);
//!
//! let figure = compose::function_comparison(&samples, "Target").unwrap();
//! assert_eq!(figure.kind.filename(), "function_comparison.png");
//! ```
//!
//! The [`pipeline`] module wires all of this together for the `gaviz` binary.
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)] // Row counts never get near 2^52
#![allow(clippy::module_name_repetitions)]

pub mod test;

pub mod compose;
pub mod error;
pub mod logging;
pub mod palette;
pub mod pipeline;
pub mod plotting;
pub mod series;
pub mod statistics;
pub mod table;

pub use error::{Error, Result};
