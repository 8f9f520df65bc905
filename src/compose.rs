//! Builds the figures this crate produces out of validated data
//!
//! Every function here is pure: it turns records, series and metrics into a [`Figure`]
//! without drawing anything. Rendering is left to [`crate::plotting::render_png`].
//!
//! | Function | File | Layout |
//! |----------|------|--------|
//! | [`function_comparison`] | `function_comparison.png` | 1×1 |
//! | [`results_plot`] | `results_plot.png` | 2×1 |
//! | [`error_analysis`] | `error_analysis.png` | 2×2 |
//! | [`trajectory_overlay`] | `trajectories_plot.png` | 1×1 |
use plotters::style::{Color, RGBAColor, RGBColor};

use crate::{
    error::{Error, Result},
    palette::{assign_colors, legend_entries},
    plotting::{
        Bar, Figure, FigureKind, GridLines, LegendPosition, LineStyle, MarkerShape, Panel,
        PlotOptions, PlottingElement,
    },
    series::{ErrorSeries, Trajectory},
    statistics::{box_summary, cumulative_abs_error, histogram, Metrics, DEFAULT_HISTOGRAM_BINS},
    table::FunctionSample,
};

const BLUE: RGBColor = RGBColor(0, 0, 255);
const RED: RGBColor = RGBColor(255, 0, 0);
const GREEN: RGBColor = RGBColor(0, 128, 0);
const BLACK: RGBColor = RGBColor(0, 0, 0);
const GRAY: RGBColor = RGBColor(128, 128, 128);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

/// Width of each bar in the signed-error chart, in x units
pub const ERROR_BAR_WIDTH: f64 = 0.15;

/// Default goal of the trajectory overlay
pub const DEFAULT_GOAL: (f64, f64) = (0.0, 0.0);

const TRAJECTORY_WIDTH: u32 = 2;
const ENDPOINT_MARKER_SIZE: u32 = 5;
const GOAL_MARKER_SIZE: u32 = 10;

/// Target function against its approximation.
///
/// The target is drawn solid blue under `target_label`, the approximation dashed red.
///
/// # Errors
/// Returns [`Error::EmptyInput`] if there are no samples.
pub fn function_comparison(samples: &[FunctionSample], target_label: &str) -> Result<Figure> {
    if samples.is_empty() {
        return Err(Error::EmptyInput("function comparison has no samples"));
    }

    let target = samples.iter().map(|s| (s.x, s.y_target)).collect();
    let approximation = samples.iter().map(|s| (s.x, s.y_approx)).collect();

    let panel = Panel::new(PlotOptions {
        title: "Comparison of Target and Approximated Functions".into(),
        x_label: Some("X".into()),
        y_label: Some("Y".into()),
        ..Default::default()
    })
    .with(line(target, target_label, BLUE.to_rgba(), 2, LineStyle::Solid))
    .with(line(
        approximation,
        "Approximated Function",
        RED.to_rgba(),
        2,
        LineStyle::Dashed,
    ));

    Ok(Figure::new(FigureKind::FunctionComparison, vec![panel]))
}

/// Target and NOP output overlaid, with the signed error per sample underneath.
///
/// - Top: the gap between the curves is shaded gray and `metrics` is printed in the
///   upper-left corner.
/// - Bottom: one bar per sample, red where the output overestimates the target and green
///   otherwise, over a black zero line.
///
/// # Errors
/// Returns [`Error::EmptyInput`] if the series is empty.
pub fn results_plot(series: &ErrorSeries, metrics: &Metrics, target_label: &str) -> Result<Figure> {
    if series.is_empty() {
        return Err(Error::EmptyInput("results have no samples"));
    }

    let difference = series
        .x()
        .iter()
        .zip(series.target().iter().zip(series.approximation()))
        .map(|(&x, (&t, &o))| (x, t.min(o), t.max(o)))
        .collect();

    let overlay = Panel::new(PlotOptions {
        title: "Target Function vs NOP Output".into(),
        x_label: Some("x".into()),
        y_label: Some("y".into()),
        legend_position: LegendPosition::UpperRight,
        ..Default::default()
    })
    .with(PlottingElement::Band {
        points: difference,
        label: Some("Difference".into()),
        color: GRAY.mix(0.2),
    })
    .with(line(
        series.target_points(),
        target_label,
        BLUE.mix(0.8),
        3,
        LineStyle::Solid,
    ))
    .with(line(
        series.approximation_points(),
        "NOP Output",
        RED.mix(0.8),
        2,
        LineStyle::Dashed,
    ))
    .with(PlottingElement::TextBox(metrics.lines()));

    let bars = series
        .x()
        .iter()
        .zip(series.error())
        .map(|(&x, &error)| Bar {
            x,
            height: error,
            color: if error > 0.0 { RED } else { GREEN }.mix(0.6),
        })
        .collect();

    let errors = Panel::new(PlotOptions {
        title: "Prediction Error (Red: Overestimate, Green: Underestimate)".into(),
        x_label: Some("x".into()),
        y_label: Some("Error".into()),
        grid: GridLines::YOnly,
        ..Default::default()
    })
    .with(PlottingElement::Bars {
        bars,
        width: ERROR_BAR_WIDTH,
        label: Some("Error: NOP - Target".into()),
    })
    .with(PlottingElement::HLine {
        y: 0.0,
        width: 1,
        color: BLACK.to_rgba(),
    });

    Ok(Figure::new(FigureKind::Results, vec![overlay, errors]))
}

/// Four views of the error column.
///
/// In row-major order: error histogram, |error| against x, cumulative |error| against x,
/// and box plots of the target and NOP output values.
///
/// # Errors
/// Returns [`Error::EmptyInput`] if the series is empty or has no finite values.
pub fn error_analysis(series: &ErrorSeries) -> Result<Figure> {
    if series.is_empty() {
        return Err(Error::EmptyInput("results have no samples"));
    }

    let distribution = Panel::new(PlotOptions {
        title: "Error Distribution".into(),
        x_label: Some("Error Value".into()),
        y_label: Some("Frequency".into()),
        ..Default::default()
    })
    .with(PlottingElement::Histogram {
        bins: histogram(series.error(), DEFAULT_HISTOGRAM_BINS)?,
        color: SKY_BLUE.mix(0.7),
    });

    let abs_points = series.x().iter().copied().zip(series.abs_error()).collect();
    let absolute = Panel::new(PlotOptions {
        title: "Absolute Error vs x".into(),
        x_label: Some("x".into()),
        y_label: Some("|Error|".into()),
        ..Default::default()
    })
    .with(PlottingElement::Line {
        points: abs_points,
        label: None,
        color: ORANGE.to_rgba(),
        width: 1,
        style: LineStyle::Solid,
        markers: Some((MarkerShape::Circle, 2)),
    });

    let cumulative = cumulative_abs_error(series.error());
    let cumulative_panel = Panel::new(PlotOptions {
        title: "Cumulative Error".into(),
        x_label: Some("x".into()),
        y_label: Some("Cumulative |Error|".into()),
        ..Default::default()
    })
    .with(PlottingElement::Band {
        points: series
            .x()
            .iter()
            .zip(&cumulative)
            .map(|(&x, &c)| (x, 0.0, c))
            .collect(),
        label: None,
        color: PURPLE.mix(0.3),
    })
    .with(PlottingElement::Line {
        points: series.x().iter().copied().zip(cumulative).collect(),
        label: None,
        color: PURPLE.to_rgba(),
        width: 2,
        style: LineStyle::Solid,
        markers: None,
    });

    let comparison = Panel::new(PlotOptions {
        title: "Distribution Comparison".into(),
        y_label: Some("Values".into()),
        grid: GridLines::YOnly,
        category_labels: vec!["Target".into(), "NOP Output".into()],
        ..Default::default()
    })
    .with(PlottingElement::BoxPlots(vec![
        box_summary(series.target())?,
        box_summary(series.approximation())?,
    ]));

    Ok(Figure::new(
        FigureKind::ErrorAnalysis,
        vec![distribution, absolute, cumulative_panel, comparison],
    ))
}

/// Every trajectory on one set of axes, heading for `goal`.
///
/// Each trajectory gets its own color and a filled circle at its first row and a cross at its
/// last row. Only the trajectories picked by [`legend_entries`] are named in the legend. A single
/// red star marks the goal.
///
/// # Errors
/// Returns [`Error::EmptyInput`] if there are no trajectories.
pub fn trajectory_overlay(trajectories: &[Trajectory<'_>], goal: (f64, f64)) -> Result<Figure> {
    if trajectories.is_empty() {
        return Err(Error::EmptyInput("no trajectories to plot"));
    }

    let (gx, gy) = goal;
    let mut panel = Panel::new(PlotOptions {
        title: format!("Trajectories to Goal ({gx},{gy})"),
        x_label: Some("X".into()),
        y_label: Some("Y".into()),
        ..Default::default()
    });

    let legend = legend_entries(trajectories.len());
    let colors = assign_colors(trajectories.len());
    for (i, (trajectory, color)) in trajectories.iter().zip(colors).enumerate() {
        let label = legend
            .binary_search(&i)
            .is_ok()
            .then(|| format!("Trajectory {}", trajectory.id()));

        panel = panel
            .with(PlottingElement::Line {
                points: trajectory.path(),
                label,
                color,
                width: TRAJECTORY_WIDTH,
                style: LineStyle::Solid,
                markers: None,
            })
            .with(endpoint(trajectory.start_point(), MarkerShape::Circle, color))
            .with(endpoint(trajectory.end_point(), MarkerShape::Cross, color));
    }

    tracing::debug!(
        trajectories = trajectories.len(),
        legend_entries = legend.len(),
        "Composed trajectory overlay"
    );

    let panel = panel.with(PlottingElement::Markers {
        points: vec![goal],
        shape: MarkerShape::Star,
        size: GOAL_MARKER_SIZE,
        color: RED.to_rgba(),
        label: Some(format!("Goal ({gx},{gy})")),
    });
    Ok(Figure::new(FigureKind::Trajectories, vec![panel]))
}

fn line(
    points: Vec<(f64, f64)>,
    label: &str,
    color: RGBAColor,
    width: u32,
    style: LineStyle,
) -> PlottingElement {
    PlottingElement::Line {
        points,
        label: Some(label.to_string()),
        color,
        width,
        style,
        markers: None,
    }
}

fn endpoint(point: (f64, f64), shape: MarkerShape, color: RGBAColor) -> PlottingElement {
    PlottingElement::Markers {
        points: vec![point],
        shape,
        size: ENDPOINT_MARKER_SIZE,
        color,
        label: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        plotting::tests::{record, Call},
        series::group_trajectories,
        table::{ResultSample, TrajectorySample},
    };

    fn trajectory_rows(ids: &[i64], rows_each: usize) -> Vec<TrajectorySample> {
        ids.iter()
            .flat_map(|&id| {
                (0..rows_each).map(move |step| TrajectorySample {
                    trajectory: id,
                    time: step as f64,
                    x: id as f64 + step as f64,
                    y: 10.0 - step as f64,
                    theta: 0.0,
                })
            })
            .collect()
    }

    fn results() -> ErrorSeries {
        let samples: Vec<_> = (0..10)
            .map(|i| {
                let x = f64::from(i) * 0.5;
                let target = x.sin();
                let nop_output = target + if i % 2 == 0 { 0.1 } else { -0.05 };
                ResultSample {
                    x,
                    target,
                    nop_output,
                    error: nop_output - target,
                }
            })
            .collect();
        ErrorSeries::from_results(&samples)
    }

    fn markers(calls: &[Call], wanted: MarkerShape) -> Vec<(f64, f64)> {
        calls
            .iter()
            .filter_map(|c| match c {
                Call::Marker { point, shape, .. } if *shape == wanted => Some(*point),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn two_trajectories_of_four_rows() {
        let rows = trajectory_rows(&[0, 1], 4);
        let trajectories = group_trajectories(&rows);
        let figure = trajectory_overlay(&trajectories, DEFAULT_GOAL).unwrap();
        assert_eq!(figure.kind.filename(), "trajectories_plot.png");

        let calls = record(&figure).remove(0);
        let lines: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Line { label, points, .. } => Some((label.clone(), points.len())),
                _ => None,
            })
            .collect();
        assert_eq!(
            lines,
            [
                (Some("Trajectory 0".to_string()), 4),
                (Some("Trajectory 1".to_string()), 4)
            ]
        );

        let starts = markers(&calls, MarkerShape::Circle);
        let ends = markers(&calls, MarkerShape::Cross);
        assert_eq!(starts.len() + ends.len(), 4);
        assert_eq!(starts, [(0.0, 10.0), (1.0, 10.0)]);
        assert_eq!(ends, [(3.0, 7.0), (4.0, 7.0)]);

        let goals: Vec<_> = calls
            .iter()
            .filter(|c| matches!(c, Call::Marker { shape: MarkerShape::Star, .. }))
            .collect();
        assert_eq!(goals.len(), 1);
        assert!(matches!(
            goals[0],
            Call::Marker { point, label: Some(l), color: (255, 0, 0), .. }
                if *point == DEFAULT_GOAL && l == "Goal (0,0)"
        ));
    }

    #[test]
    fn endpoint_markers_share_the_trajectory_color() {
        let rows = trajectory_rows(&[4, 9], 3);
        let figure = trajectory_overlay(&group_trajectories(&rows), DEFAULT_GOAL).unwrap();
        let calls = record(&figure).remove(0);

        let line_colors: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Line { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(line_colors, [(0, 0, 255), (255, 0, 0)]);

        let marker_colors: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Marker {
                    shape: MarkerShape::Circle | MarkerShape::Cross,
                    color,
                    ..
                } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(
            marker_colors,
            [(0, 0, 255), (0, 0, 255), (255, 0, 0), (255, 0, 0)]
        );
    }

    #[test]
    fn many_trajectories_get_a_thinned_legend() {
        let ids: Vec<i64> = (0..20).collect();
        let rows = trajectory_rows(&ids, 2);
        let figure = trajectory_overlay(&group_trajectories(&rows), (1.5, -2.0)).unwrap();

        let panel = &figure.panels[0];
        assert_eq!(panel.options.title, "Trajectories to Goal (1.5,-2)");

        let labels = panel.labels();
        assert_eq!(
            labels,
            [
                "Trajectory 0",
                "Trajectory 3",
                "Trajectory 6",
                "Trajectory 9",
                "Trajectory 12",
                "Trajectory 15",
                "Trajectory 18",
                "Trajectory 19",
                "Goal (1.5,-2)"
            ]
        );

        // Every trajectory is still drawn
        let lines = panel
            .elements
            .iter()
            .filter(|e| matches!(e, PlottingElement::Line { .. }))
            .count();
        assert_eq!(lines, 20);
    }

    #[test]
    fn every_trajectory_gets_its_own_color() {
        let ids: Vec<i64> = (0..30).collect();
        let rows = trajectory_rows(&ids, 2);
        let figure = trajectory_overlay(&group_trajectories(&rows), DEFAULT_GOAL).unwrap();
        let calls = record(&figure).remove(0);

        let line_colors: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Line { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        let expected: Vec<_> = assign_colors(30).iter().map(|c| (c.0, c.1, c.2)).collect();
        assert_eq!(line_colors, expected);
    }

    #[test]
    fn no_trajectories_is_an_error() {
        assert!(matches!(
            trajectory_overlay(&[], DEFAULT_GOAL),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn function_comparison_draws_target_and_dashed_approximation() {
        let samples = [
            FunctionSample {
                x: 0.0,
                y_target: 1.0,
                y_approx: 0.9,
            },
            FunctionSample {
                x: 1.0,
                y_target: 2.0,
                y_approx: 2.1,
            },
        ];
        let figure = function_comparison(&samples, "Target: sin(x) + cos(2.5x)").unwrap();
        assert_eq!(figure.kind, FigureKind::FunctionComparison);

        let calls = record(&figure).remove(0);
        let styles: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Line {
                    label,
                    style,
                    color,
                    ..
                } => Some((label.clone().unwrap_or_default(), *style, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(
            styles,
            [
                (
                    "Target: sin(x) + cos(2.5x)".to_string(),
                    LineStyle::Solid,
                    (0, 0, 255)
                ),
                (
                    "Approximated Function".to_string(),
                    LineStyle::Dashed,
                    (255, 0, 0)
                ),
            ]
        );

        assert!(function_comparison(&[], "Target").is_err());
    }

    #[test]
    fn results_plot_has_overlay_and_colored_error_bars() {
        let series = results();
        let metrics = series.metrics().unwrap();
        let figure = results_plot(&series, &metrics, "Target Function").unwrap();
        assert_eq!(figure.kind.layout(), (2, 1));
        assert_eq!(figure.panels.len(), 2);

        let calls = record(&figure);
        assert!(calls[0].contains(&Call::TextBox(metrics.lines())));
        assert_eq!(
            figure.panels[0].labels(),
            ["Difference", "Target Function", "NOP Output"]
        );

        let bars: Vec<_> = calls[1]
            .iter()
            .filter_map(|c| match c {
                Call::Rect { to, color, .. } => Some((to.1, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), series.len());
        for (height, color) in bars {
            let expected = if height > 0.0 { (255, 0, 0) } else { (0, 128, 0) };
            assert_eq!(color, expected);
        }

        // The zero baseline is a black horizontal line across the panel
        assert!(calls[1].iter().any(|c| matches!(
            c,
            Call::Line { points, color: (0, 0, 0), .. } if points.iter().all(|p| p.1 == 0.0)
        )));
        assert_eq!(figure.panels[1].options.grid, GridLines::YOnly);
    }

    #[test]
    fn error_analysis_has_four_panels() {
        let series = results();
        let figure = error_analysis(&series).unwrap();
        assert_eq!(figure.kind.filename(), "error_analysis.png");

        let titles: Vec<_> = figure
            .panels
            .iter()
            .map(|p| p.options.title.as_str())
            .collect();
        assert_eq!(
            titles,
            [
                "Error Distribution",
                "Absolute Error vs x",
                "Cumulative Error",
                "Distribution Comparison"
            ]
        );

        let PlottingElement::Histogram { bins, .. } = &figure.panels[0].elements[0] else {
            panic!("expected a histogram");
        };
        assert_eq!(bins.len(), DEFAULT_HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), series.len());

        let PlottingElement::Line { points, .. } = &figure.panels[2].elements[1] else {
            panic!("expected the cumulative line");
        };
        let last = points.last().unwrap().1;
        let total: f64 = series.abs_error().iter().sum();
        crate::assert_close!(last, total, tol = 1e-12);

        let calls = record(&figure);
        // Markers on every |error| point
        assert_eq!(markers(&calls[1], MarkerShape::Circle).len(), series.len());
        assert_eq!(
            figure.panels[3].options.category_labels,
            ["Target", "NOP Output"]
        );
    }

    #[test]
    fn empty_results_are_rejected() {
        let series = ErrorSeries::from_results(&[]);
        assert!(matches!(error_analysis(&series), Err(Error::EmptyInput(_))));
    }
}
