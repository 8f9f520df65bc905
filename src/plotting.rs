//! Figure description and rendering
//!
//! A [`Figure`] is plain data: a grid of [`Panel`]s, each holding [`PlottingElement`]s and
//! [`PlotOptions`]. Building one never touches the filesystem, so the composed content can be
//! inspected directly. [`render_png`] then draws it through the `plotters` backend.
//!
//! Drawing goes through the [`PlotBackend`] trait, so a figure can be replayed onto any backend.
use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

mod backend;
pub use backend::*;

mod element;
pub use element::*;

/// Fraction of the data extent added on each side of an axis
const RANGE_PADDING: f64 = 0.05;

/// Which grid lines a panel draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridLines {
    /// Grid lines along both axes
    #[default]
    Both,
    /// Horizontal grid lines only
    YOnly,
    /// No grid lines
    Hidden,
}

/// Corner of the plot the legend is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    /// Upper left
    UpperLeft,
    /// Upper right
    #[default]
    UpperRight,
    /// Lower left
    LowerLeft,
    /// Lower right
    LowerRight,
}

/// Options for plotting one panel
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    /// Caption for the plot
    pub title: String,

    /// X-axis label
    pub x_label: Option<String>,

    /// Y-axis label
    pub y_label: Option<String>,

    /// X-axis range; computed from the elements if not set
    pub x_range: Option<Range<f64>>,

    /// Y-axis range; computed from the elements if not set
    pub y_range: Option<Range<f64>>,

    /// Whether to hide the legend
    pub hide_legend: bool,

    /// Where the legend goes
    pub legend_position: LegendPosition,

    /// Which grid lines to draw
    pub grid: GridLines,

    /// Names for the x positions 1, 2, 3, ...; replaces numeric x tick labels when set
    pub category_labels: Vec<String>,
}

/// One plot within a figure
#[derive(Debug, Clone, Default)]
pub struct Panel {
    /// Title, labels and axis options
    pub options: PlotOptions,

    /// Elements, in drawing order
    pub elements: Vec<PlottingElement>,
}
impl Panel {
    /// An empty panel with the given options
    #[must_use]
    pub fn new(options: PlotOptions) -> Self {
        Self {
            options,
            elements: Vec::new(),
        }
    }

    /// Adds an element on top of the existing ones
    #[must_use]
    pub fn with(mut self, element: PlottingElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Axis ranges of the panel
    ///
    /// Ranges set in the options win. Otherwise the range covers every element, padded by 5% on
    /// each side. A range with no extent is widened so the axis is never empty.
    #[must_use]
    pub fn ranges(&self) -> (Range<f64>, Range<f64>) {
        let bounds = self
            .elements
            .iter()
            .filter_map(PlottingElement::bounds)
            .reduce(Bounds::union)
            .unwrap_or(Bounds {
                x: (0.0, 1.0),
                y: (0.0, 1.0),
            });

        let x = self
            .options
            .x_range
            .clone()
            .unwrap_or_else(|| padded(bounds.x));
        let y = self
            .options
            .y_range
            .clone()
            .unwrap_or_else(|| padded(bounds.y));
        (x, y)
    }

    /// Legend labels of the panel's elements, in drawing order
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(PlottingElement::label)
            .collect()
    }
}

fn padded((min, max): (f64, f64)) -> Range<f64> {
    let extent = max - min;
    if extent > 0.0 {
        let pad = extent * RANGE_PADDING;
        return (min - pad)..(max + pad);
    }

    let pad = if min == 0.0 { 0.5 } else { min.abs() * RANGE_PADDING };
    (min - pad)..(max + pad)
}

/// The figures this crate produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    /// Target function against its approximation
    FunctionComparison,
    /// Overlay of target and output, with the signed error underneath
    Results,
    /// Error histogram, error against input, cumulative error and value distributions
    ErrorAnalysis,
    /// Every robot trajectory with its start and end states and the goal
    Trajectories,
}
impl FigureKind {
    /// Name of the file the figure is saved to
    #[must_use]
    pub fn filename(self) -> &'static str {
        match self {
            FigureKind::FunctionComparison => "function_comparison.png",
            FigureKind::Results => "results_plot.png",
            FigureKind::ErrorAnalysis => "error_analysis.png",
            FigureKind::Trajectories => "trajectories_plot.png",
        }
    }

    /// Size of the figure, in inches
    #[must_use]
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            FigureKind::FunctionComparison => (10.0, 6.0),
            FigureKind::Results | FigureKind::ErrorAnalysis => (14.0, 10.0),
            FigureKind::Trajectories => (10.0, 8.0),
        }
    }

    /// Resolution of the saved image
    #[must_use]
    pub fn dpi(self) -> u32 {
        match self {
            FigureKind::FunctionComparison | FigureKind::Trajectories => 100,
            FigureKind::Results | FigureKind::ErrorAnalysis => 300,
        }
    }

    /// Size of the saved image, in pixels
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(self) -> (u32, u32) {
        let (w, h) = self.size_inches();
        let dpi = f64::from(self.dpi());
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }

    /// Factor applied to line widths, marker and font sizes relative to 100 dpi
    #[must_use]
    pub fn scale(self) -> f64 {
        f64::from(self.dpi()) / 100.0
    }

    /// Panel grid as `(rows, columns)`
    #[must_use]
    pub fn layout(self) -> (usize, usize) {
        match self {
            FigureKind::FunctionComparison | FigureKind::Trajectories => (1, 1),
            FigureKind::Results => (2, 1),
            FigureKind::ErrorAnalysis => (2, 2),
        }
    }
}

/// A complete figure: its kind and one panel per layout cell, in row-major order
#[derive(Debug, Clone)]
pub struct Figure {
    /// What the figure shows, which also fixes its size and file name
    pub kind: FigureKind,

    /// Panels in row-major order
    pub panels: Vec<Panel>,
}
impl Figure {
    /// Creates a figure from its panels
    #[must_use]
    pub fn new(kind: FigureKind, panels: Vec<Panel>) -> Self {
        Self { kind, panels }
    }

    /// Draws every panel onto the matching root
    ///
    /// # Errors
    /// Returns the first error raised by the backend.
    pub fn draw<'a, B: PlotBackend<'a>>(
        &self,
        roots: &'a [B::Root],
    ) -> std::result::Result<(), B::Error> {
        let scale = self.kind.scale();
        for (panel, root) in self.panels.iter().zip(roots) {
            let (x_range, y_range) = panel.ranges();
            let mut plot = B::new_plot(root, &panel.options, x_range, y_range, scale)?;
            for element in &panel.elements {
                plot.add_element(element)?;
            }
            plot.finalize()?;
        }
        Ok(())
    }
}

/// Renders `figure` as a PNG in `output_dir`, creating the directory if needed.
///
/// Returns the path of the written file, which is `output_dir` joined with the figure's file name.
/// An existing file of the same name is replaced. If drawing fails, no file is left behind.
///
/// # Errors
/// - [`Error::Io`] if the output directory cannot be created
/// - [`Error::Render`] if the figure cannot be drawn or saved
pub fn render_png(figure: &Figure, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(figure.kind.filename());
    if let Err(e) = draw_to_file(figure, &path) {
        // The bitmap is flushed when the canvas drops, even after a failed draw
        let _ = std::fs::remove_file(&path);
        return Err(e);
    }

    tracing::info!(path = %path.display(), "Plot saved");
    Ok(path)
}

fn draw_to_file(figure: &Figure, path: &Path) -> Result<()> {
    let (width, height) = figure.kind.pixel_size();
    tracing::debug!(
        file = figure.kind.filename(),
        width,
        height,
        panels = figure.panels.len(),
        "Rendering figure"
    );

    let canvas = backend::plotters::Canvas::new(path, (width, height)).map_err(render_error)?;
    let roots = canvas.split(figure.kind.layout());
    figure
        .draw::<backend::plotters::Backend>(&roots)
        .map_err(render_error)?;
    canvas.present().map_err(render_error)
}

fn render_error(e: backend::plotters::Error) -> Error {
    Error::Render(e.to_string())
}
