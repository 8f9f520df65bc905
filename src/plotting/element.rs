use plotters::style::RGBAColor;

use crate::statistics::{Bin, BoxSummary};

/// How a line is stroked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Continuous stroke
    Solid,
    /// Dashed stroke
    Dashed,
}

/// Shape of a point marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Filled circle
    Circle,
    /// Diagonal cross, an "x"
    Cross,
    /// Filled five-pointed star
    Star,
}

/// One bar of a bar chart, rising from zero to `height`
#[derive(Debug, Clone, Copy)]
pub struct Bar {
    /// Center of the bar
    pub x: f64,
    /// Signed height
    pub height: f64,
    /// Fill color
    pub color: RGBAColor,
}

/// Elements that can be plotted
///
/// These are plain data; a [`crate::plotting::PlotBackend`] decides how to draw them.
#[derive(Debug, Clone)]
pub enum PlottingElement {
    /// A polyline through `points`, optionally with a marker at every point
    Line {
        /// Points in drawing order
        points: Vec<(f64, f64)>,
        /// Legend entry, if any
        label: Option<String>,
        /// Stroke color
        color: RGBAColor,
        /// Stroke width in pixels at 100 dpi
        width: u32,
        /// Solid or dashed
        style: LineStyle,
        /// Marker shape and size drawn at each point
        markers: Option<(MarkerShape, u32)>,
    },

    /// A filled region between two curves sharing x values
    ///
    /// `(x, lower, upper)`
    Band {
        /// Region edges, in x order
        points: Vec<(f64, f64, f64)>,
        /// Legend entry, if any
        label: Option<String>,
        /// Fill color
        color: RGBAColor,
    },

    /// A set of individual points
    Markers {
        /// Marker positions
        points: Vec<(f64, f64)>,
        /// Marker shape
        shape: MarkerShape,
        /// Marker radius in pixels at 100 dpi
        size: u32,
        /// Marker color
        color: RGBAColor,
        /// Legend entry, if any
        label: Option<String>,
    },

    /// Bars rising from zero, one per sample
    Bars {
        /// The bars
        bars: Vec<Bar>,
        /// Bar width, in x units
        width: f64,
        /// Legend entry, if any
        label: Option<String>,
    },

    /// A horizontal line across the whole plot
    HLine {
        /// Height of the line
        y: f64,
        /// Stroke width in pixels at 100 dpi
        width: u32,
        /// Stroke color
        color: RGBAColor,
    },

    /// Histogram bars with black edges
    Histogram {
        /// Bins, in ascending order
        bins: Vec<Bin>,
        /// Fill color
        color: RGBAColor,
    },

    /// Box plots placed at x = 1, 2, 3, ...
    BoxPlots(Vec<BoxSummary>),

    /// Lines of text in a box at the upper-left corner of the plot
    TextBox(Vec<String>),
}
impl PlottingElement {
    /// Legend label of this element, if any
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            PlottingElement::Line { label, .. }
            | PlottingElement::Band { label, .. }
            | PlottingElement::Markers { label, .. }
            | PlottingElement::Bars { label, .. } => label.as_deref(),
            PlottingElement::HLine { .. }
            | PlottingElement::Histogram { .. }
            | PlottingElement::BoxPlots(_)
            | PlottingElement::TextBox(_) => None,
        }
    }

    /// Data extent of this element, or `None` if it does not constrain the axes
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            PlottingElement::Line { points, .. } | PlottingElement::Markers { points, .. } => {
                Bounds::from_points(points.iter().copied())
            }

            PlottingElement::Band { points, .. } => Bounds::from_points(
                points
                    .iter()
                    .flat_map(|&(x, lower, upper)| [(x, lower), (x, upper)]),
            ),

            PlottingElement::Bars { bars, width, .. } => {
                let half = width / 2.0;
                Bounds::from_points(bars.iter().flat_map(|bar| {
                    [(bar.x - half, 0.0), (bar.x + half, bar.height)]
                }))
            }

            PlottingElement::Histogram { bins, .. } => Bounds::from_points(
                bins.iter()
                    .flat_map(|bin| [(bin.start, 0.0), (bin.end, bin.count as f64)]),
            ),

            PlottingElement::BoxPlots(boxes) => {
                let mut bounds = Bounds::from_points(
                    boxes
                        .iter()
                        .flat_map(|summary| [(1.0, summary.min()), (1.0, summary.max())]),
                )?;
                bounds.x = (0.5, boxes.len() as f64 + 0.5);
                Some(bounds)
            }

            PlottingElement::HLine { .. } | PlottingElement::TextBox(_) => None,
        }
    }
}

/// Axis-aligned extent of some data, `(min, max)` per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// x extent
    pub x: (f64, f64),
    /// y extent
    pub y: (f64, f64),
}
impl Bounds {
    /// Extent of the finite points in `points`, or `None` if there are none
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .fold(None, |bounds: Option<Self>, (x, y)| {
                Some(match bounds {
                    Some(b) => Self {
                        x: (b.x.0.min(x), b.x.1.max(x)),
                        y: (b.y.0.min(y), b.y.1.max(y)),
                    },
                    None => Self { x: (x, x), y: (y, y) },
                })
            })
    }

    /// Smallest extent covering both
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            x: (self.x.0.min(other.x.0), self.x.1.max(other.x.1)),
            y: (self.y.0.min(other.y.0), self.y.1.max(other.y.1)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use plotters::style::{Color, BLACK};

    use super::*;

    #[test]
    fn bounds_skip_non_finite_points() {
        let bounds =
            Bounds::from_points([(0.0, 1.0), (f64::NAN, 9.0), (2.0, -1.0), (3.0, f64::INFINITY)])
                .unwrap();
        assert_eq!(bounds.x, (0.0, 2.0));
        assert_eq!(bounds.y, (-1.0, 1.0));
        assert_eq!(Bounds::from_points([]), None);
    }

    #[test]
    fn bars_include_zero_and_half_width() {
        let bars = PlottingElement::Bars {
            bars: vec![
                Bar {
                    x: 1.0,
                    height: 2.0,
                    color: BLACK.to_rgba(),
                },
                Bar {
                    x: 2.0,
                    height: 0.5,
                    color: BLACK.to_rgba(),
                },
            ],
            width: 0.5,
            label: Some("Error".into()),
        };
        let bounds = bars.bounds().unwrap();
        assert_eq!(bounds.x, (0.75, 2.25));
        assert_eq!(bounds.y, (0.0, 2.0));
        assert_eq!(bars.label(), Some("Error"));
    }

    #[test]
    fn band_covers_both_edges() {
        let band = PlottingElement::Band {
            points: vec![(0.0, -1.0, 1.0), (1.0, 0.0, 3.0)],
            label: None,
            color: BLACK.to_rgba(),
        };
        let bounds = band.bounds().unwrap();
        assert_eq!(bounds.y, (-1.0, 3.0));
    }

    #[test]
    fn box_plots_span_category_slots() {
        let summary = crate::statistics::box_summary(&[1.0, 2.0, 3.0]).unwrap();
        let boxes = PlottingElement::BoxPlots(vec![summary.clone(), summary]);
        let bounds = boxes.bounds().unwrap();
        assert_eq!(bounds.x, (0.5, 2.5));
        assert_eq!(bounds.y, (1.0, 3.0));
    }

    #[test]
    fn decorations_do_not_constrain_axes() {
        assert!(PlottingElement::TextBox(vec!["RMSE".into()])
            .bounds()
            .is_none());
        assert!(PlottingElement::HLine {
            y: 0.0,
            width: 1,
            color: BLACK.to_rgba()
        }
        .bounds()
        .is_none());
    }
}
