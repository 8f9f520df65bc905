use std::ops::Range;

use ::plotters::style::{Color, RGBAColor, RGBColor, BLACK};

use crate::{
    plotting::{LineStyle, MarkerShape, PlotOptions, PlottingElement},
    statistics::BoxSummary,
};

pub mod plotters;

const MEDIAN_COLOR: RGBColor = RGBColor(255, 165, 0);
const BOX_HALF_WIDTH: f64 = 0.25;
const OUTLIER_SIZE: u32 = 3;

/// Trait for plot backends
///
/// A backend draws one panel at a time. Sizes are given in pixels at 100 dpi; the backend
/// multiplies them by the `scale` it was created with.
pub trait PlotBackend<'a>: Sized {
    /// Error type for the plot backend
    type Error: std::error::Error;

    /// Drawing area a panel is placed on
    type Root: 'a;

    /// Create a new plot on the given root, drawing its axes, grid and title
    ///
    /// # Errors
    /// Returns an error if the plot cannot be created.
    fn new_plot(
        root: &'a Self::Root,
        options: &PlotOptions,
        x_range: Range<f64>,
        y_range: Range<f64>,
        scale: f64,
    ) -> Result<Self, Self::Error>;

    /// Visible x range of the plot
    fn x_range(&self) -> Range<f64>;

    /// Add a line to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_line(
        &mut self,
        points: &[(f64, f64)],
        label: Option<&str>,
        width: u32,
        style: LineStyle,
        color: RGBAColor,
    ) -> Result<(), Self::Error>;

    /// Fill the region between two curves, given as `(x, lower, upper)`
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_area(
        &mut self,
        points: &[(f64, f64, f64)],
        label: Option<&str>,
        color: RGBAColor,
    ) -> Result<(), Self::Error>;

    /// Add a single marker to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_marker(
        &mut self,
        point: (f64, f64),
        shape: MarkerShape,
        size: u32,
        color: RGBAColor,
        label: Option<&str>,
    ) -> Result<(), Self::Error>;

    /// Add a filled rectangle between two corners, with an optional outline
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_rect(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        fill: RGBAColor,
        outline: Option<RGBAColor>,
        label: Option<&str>,
    ) -> Result<(), Self::Error>;

    /// Add a block of text to the upper-left corner of the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_text_box(&mut self, lines: &[String]) -> Result<(), Self::Error>;

    /// Finalize the plot, drawing the legend if any element was labelled
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn finalize(self) -> Result<(), Self::Error>;

    /// Add a plotting element to the plot
    ///
    /// Elements made of many shapes carry their legend label on the first shape only.
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_element(&mut self, element: &PlottingElement) -> Result<(), Self::Error> {
        match element {
            PlottingElement::Line {
                points,
                label,
                color,
                width,
                style,
                markers,
            } => {
                self.add_line(points, label.as_deref(), *width, *style, *color)?;
                if let Some((shape, size)) = markers {
                    for point in points {
                        self.add_marker(*point, *shape, *size, *color, None)?;
                    }
                }
                Ok(())
            }

            PlottingElement::Band {
                points,
                label,
                color,
            } => self.add_area(points, label.as_deref(), *color),

            PlottingElement::Markers {
                points,
                shape,
                size,
                color,
                label,
            } => {
                for (i, point) in points.iter().enumerate() {
                    let label = label.as_deref().filter(|_| i == 0);
                    self.add_marker(*point, *shape, *size, *color, label)?;
                }
                Ok(())
            }

            PlottingElement::Bars { bars, width, label } => {
                let half = width / 2.0;
                for (i, bar) in bars.iter().enumerate() {
                    let label = label.as_deref().filter(|_| i == 0);
                    self.add_rect(
                        (bar.x - half, 0.0),
                        (bar.x + half, bar.height),
                        bar.color,
                        None,
                        label,
                    )?;
                }
                Ok(())
            }

            PlottingElement::HLine { y, width, color } => {
                let x = self.x_range();
                self.add_line(
                    &[(x.start, *y), (x.end, *y)],
                    None,
                    *width,
                    LineStyle::Solid,
                    *color,
                )
            }

            PlottingElement::Histogram { bins, color } => {
                for bin in bins.iter().filter(|bin| bin.count > 0) {
                    self.add_rect(
                        (bin.start, 0.0),
                        (bin.end, bin.count as f64),
                        *color,
                        Some(BLACK.to_rgba()),
                        None,
                    )?;
                }
                Ok(())
            }

            PlottingElement::BoxPlots(boxes) => {
                for (i, summary) in boxes.iter().enumerate() {
                    self.add_box(i as f64 + 1.0, summary)?;
                }
                Ok(())
            }

            PlottingElement::TextBox(lines) => self.add_text_box(lines),
        }
    }

    /// Add one box plot centered on `position`
    ///
    /// The box spans the quartiles with the median across it. Whiskers end with caps,
    /// and outliers are drawn as small circles.
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_box(&mut self, position: f64, summary: &BoxSummary) -> Result<(), Self::Error> {
        let edge = BLACK.to_rgba();
        let (left, right) = (position - BOX_HALF_WIDTH, position + BOX_HALF_WIDTH);
        let cap = BOX_HALF_WIDTH / 2.0;

        self.add_rect(
            (left, summary.q1),
            (right, summary.q3),
            RGBAColor(255, 255, 255, 1.0),
            Some(edge),
            None,
        )?;
        self.add_line(
            &[(left, summary.median), (right, summary.median)],
            None,
            2,
            LineStyle::Solid,
            MEDIAN_COLOR.to_rgba(),
        )?;

        for (from, to) in [
            (summary.q1, summary.whisker_low),
            (summary.q3, summary.whisker_high),
        ] {
            self.add_line(
                &[(position, from), (position, to)],
                None,
                1,
                LineStyle::Solid,
                edge,
            )?;
            self.add_line(
                &[(position - cap, to), (position + cap, to)],
                None,
                1,
                LineStyle::Solid,
                edge,
            )?;
        }

        for outlier in &summary.outliers {
            self.add_marker(
                (position, *outlier),
                MarkerShape::Circle,
                OUTLIER_SIZE,
                edge,
                None,
            )?;
        }
        Ok(())
    }
}


#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use std::cell::RefCell;

    use ::plotters::style::{Color, BLUE, RED};

    use super::recorder::{Call, Recorder};
    use super::*;
    use crate::plotting::Bar;

    fn record(elements: &[PlottingElement]) -> Vec<Call> {
        let log = RefCell::new(Vec::new());
        {
            let mut plot =
                Recorder::new_plot(&log, &PlotOptions::default(), 0.0..10.0, -1.0..1.0, 1.0)
                    .unwrap();
            for element in elements {
                plot.add_element(element).unwrap();
            }
            plot.finalize().unwrap();
        }
        log.into_inner()
    }

    #[test]
    fn markers_label_only_the_first_point() {
        let calls = record(&[PlottingElement::Markers {
            points: vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)],
            shape: MarkerShape::Circle,
            size: 4,
            color: BLUE.to_rgba(),
            label: Some("Start".into()),
        }]);

        let labels: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Marker { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, [Some("Start".to_string()), None, None]);
    }

    #[test]
    fn hline_spans_the_visible_range() {
        let calls = record(&[PlottingElement::HLine {
            y: 0.0,
            width: 1,
            color: BLACK.to_rgba(),
        }]);
        assert!(calls.iter().any(|c| matches!(
            c,
            Call::Line { points, .. } if points == &[(0.0, 0.0), (10.0, 0.0)]
        )));
    }

    #[test]
    fn bars_rise_from_zero() {
        let calls = record(&[PlottingElement::Bars {
            bars: vec![
                Bar {
                    x: 1.0,
                    height: -0.5,
                    color: RED.to_rgba(),
                },
                Bar {
                    x: 2.0,
                    height: 0.5,
                    color: BLUE.to_rgba(),
                },
            ],
            width: 0.5,
            label: Some("Error".into()),
        }]);

        let rects: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Rect {
                    from, to, label, ..
                } => Some((*from, *to, label.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            rects,
            [
                ((0.75, 0.0), (1.25, -0.5), Some("Error".to_string())),
                ((1.75, 0.0), (2.25, 0.5), None),
            ]
        );
    }

    #[test]
    fn line_markers_follow_every_point() {
        let calls = record(&[PlottingElement::Line {
            points: vec![(0.0, 1.0), (1.0, 2.0)],
            label: Some("|err|".into()),
            color: RED.to_rgba(),
            width: 2,
            style: LineStyle::Solid,
            markers: Some((MarkerShape::Circle, 2)),
        }]);
        let markers = calls
            .iter()
            .filter(|c| matches!(c, Call::Marker { label: None, .. }))
            .count();
        assert_eq!(markers, 2);
    }

    #[test]
    fn box_plot_draws_median_and_outliers() {
        let summary =
            crate::statistics::box_summary(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        let outliers = summary.outliers.clone();
        let calls = record(&[PlottingElement::BoxPlots(vec![summary])]);

        let medians = calls
            .iter()
            .filter(|c| matches!(c, Call::Line { color: (255, 165, 0), .. }))
            .count();
        assert_eq!(medians, 1);

        let drawn: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Marker { point, .. } => Some(point.1),
                _ => None,
            })
            .collect();
        assert_eq!(drawn, outliers);
        assert_eq!(calls.last(), Some(&Call::Finalize));
    }
}
