//! Plotting backend using the `plotters` crate
//!
//! Uses the bitmap backend to create PNG files. Text is drawn with the system sans-serif font.
//!
//! Pixel sizes handed to the backend are for 100 dpi, and are multiplied by the figure's scale
//! so that high-resolution figures keep the same proportions.
use std::{ops::Range, path::Path};

use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
};

use crate::plotting::{GridLines, LegendPosition, LineStyle, MarkerShape, PlotBackend, PlotOptions};

const MAX_LBL_WIDTH: usize = 120;
const LEGEND_SAMPLE_WIDTH: f64 = 20.0;
const TEXT_BOX_FILL: RGBColor = RGBColor(245, 222, 179);
const ZERO_TICK_TOLERANCE: f64 = 1e-12;

/// The whole image of a figure, backed by a PNG file
///
/// The file is written by [`Canvas::present`], or when the canvas is dropped.
pub struct Canvas<'a>(DrawingArea<BitMapBackend<'a>, Shift>);
impl<'a> Canvas<'a> {
    /// Create a white canvas of `size` pixels that will be saved to `path`
    ///
    /// # Errors
    /// Returns an error if the canvas cannot be filled.
    pub fn new(path: &'a Path, size: (u32, u32)) -> Result<Self, Error> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        Ok(Self(root))
    }

    /// Split the canvas into a `(rows, columns)` grid of panel roots, in row-major order
    #[must_use]
    pub fn split(&self, layout: (usize, usize)) -> Vec<Root<'a>> {
        self.0.split_evenly(layout).into_iter().map(Root).collect()
    }

    /// Write the image to its file
    ///
    /// # Errors
    /// Returns an error if the image cannot be encoded or written.
    pub fn present(&self) -> Result<(), Error> {
        self.0.present()?;
        Ok(())
    }
}

/// A drawing area root for one panel
pub struct Root<'a>(DrawingArea<BitMapBackend<'a>, Shift>);
impl<'a> AsRef<DrawingArea<BitMapBackend<'a>, Shift>> for Root<'a> {
    fn as_ref(&self) -> &DrawingArea<BitMapBackend<'a>, Shift> {
        &self.0
    }
}

/// Plotters backend for plotting
pub struct Backend<'root, 'img> {
    context: ChartContext<'root, BitMapBackend<'img>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_range: Range<f64>,
    y_range: Range<f64>,
    scale: f64,

    legend: Option<LegendPosition>,
    has_labels: bool,
}
impl Backend<'_, '_> {
    fn px(&self, size: f64) -> u32 {
        scaled(size, self.scale)
    }

    fn px_i(&self, size: f64) -> i32 {
        i32::try_from(self.px(size)).unwrap_or(i32::MAX)
    }
}
impl<'root, 'img: 'root> PlotBackend<'root> for Backend<'root, 'img> {
    type Error = Error;
    type Root = Root<'img>;

    fn new_plot(
        root: &'root Self::Root,
        options: &PlotOptions,
        x_range: Range<f64>,
        y_range: Range<f64>,
        scale: f64,
    ) -> Result<Self, Self::Error> {
        let mut builder = ChartBuilder::on(root.as_ref());
        builder
            .margin(scaled(10.0, scale))
            .x_label_area_size(scaled(45.0, scale))
            .y_label_area_size(scaled(65.0, scale));

        if !options.title.is_empty() {
            builder.caption(
                &options.title,
                (FontFamily::SansSerif, 16.0 * scale)
                    .into_font()
                    .style(FontStyle::Bold),
            );
        }

        let mut context = builder.build_cartesian_2d(x_range.clone(), y_range.clone())?;
        let extents = (x_range.end - x_range.start, y_range.end - y_range.start);
        draw_mesh(&mut context, options, scale, extents)?;

        Ok(Self {
            context,
            x_range,
            y_range,
            scale,

            legend: (!options.hide_legend).then_some(options.legend_position),
            has_labels: false,
        })
    }

    fn x_range(&self) -> Range<f64> {
        self.x_range.clone()
    }

    fn add_line(
        &mut self,
        points: &[(f64, f64)],
        label: Option<&str>,
        width: u32,
        style: LineStyle,
        color: RGBAColor,
    ) -> Result<(), Self::Error> {
        let shape = ShapeStyle::from(color).stroke_width(self.px(f64::from(width)));
        let sample = self.px_i(LEGEND_SAMPLE_WIDTH);
        let (dash, gap) = (self.px(6.0), self.px(4.0));

        let points = points.to_vec();
        let anno = match style {
            LineStyle::Solid => self.context.draw_series(LineSeries::new(points, shape))?,
            LineStyle::Dashed => self
                .context
                .draw_series(DashedLineSeries::new(points, dash, gap, shape))?,
        };

        if let Some(label) = label {
            anno.label(shorten(label))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + sample, y)], shape));
            self.has_labels = true;
        }
        Ok(())
    }

    fn add_area(
        &mut self,
        points: &[(f64, f64, f64)],
        label: Option<&str>,
        color: RGBAColor,
    ) -> Result<(), Self::Error> {
        if points.is_empty() {
            return Ok(());
        }

        //
        // Walk the upper edge forwards, then the lower edge back
        let mut outline: Vec<(f64, f64)> = points.iter().map(|&(x, _, upper)| (x, upper)).collect();
        outline.extend(points.iter().rev().map(|&(x, lower, _)| (x, lower)));

        let style = color.filled();
        let (sample, half) = (self.px_i(LEGEND_SAMPLE_WIDTH), self.px_i(5.0));
        let anno = self
            .context
            .draw_series(std::iter::once(Polygon::new(outline, style)))?;

        if let Some(label) = label {
            anno.label(shorten(label)).legend(move |(x, y)| {
                Rectangle::new([(x, y - half), (x + sample, y + half)], style)
            });
            self.has_labels = true;
        }
        Ok(())
    }

    fn add_marker(
        &mut self,
        point: (f64, f64),
        shape: MarkerShape,
        size: u32,
        color: RGBAColor,
        label: Option<&str>,
    ) -> Result<(), Self::Error> {
        let radius = self.px(f64::from(size));
        let fill = ShapeStyle::from(color).filled();
        let stroke = ShapeStyle::from(color).stroke_width(self.px(2.0));
        let label = label.map(shorten);
        if label.is_some() {
            self.has_labels = true;
        }

        match shape {
            MarkerShape::Circle => {
                let anno = self
                    .context
                    .draw_series(std::iter::once(Circle::new(point, radius, fill)))?;
                if let Some(label) = label {
                    anno.label(label)
                        .legend(move |c| Circle::new(c, radius, fill));
                }
            }

            MarkerShape::Cross => {
                let anno = self
                    .context
                    .draw_series(std::iter::once(Cross::new(point, radius, stroke)))?;
                if let Some(label) = label {
                    anno.label(label)
                        .legend(move |c| Cross::new(c, radius, stroke));
                }
            }

            MarkerShape::Star => {
                let star = star_points(radius);
                let anno = self.context.draw_series(std::iter::once(
                    EmptyElement::at(point) + Polygon::new(star.clone(), fill),
                ))?;
                if let Some(label) = label {
                    anno.label(label).legend(move |(x, y)| {
                        let star: Vec<_> =
                            star.iter().map(|&(dx, dy)| (x + dx, y + dy)).collect();
                        Polygon::new(star, fill)
                    });
                }
            }
        }
        Ok(())
    }

    fn add_rect(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        fill: RGBAColor,
        outline: Option<RGBAColor>,
        label: Option<&str>,
    ) -> Result<(), Self::Error> {
        let style = fill.filled();
        let (sample, half) = (self.px_i(LEGEND_SAMPLE_WIDTH), self.px_i(5.0));
        let anno = self
            .context
            .draw_series(std::iter::once(Rectangle::new([from, to], style)))?;

        if let Some(label) = label {
            anno.label(shorten(label)).legend(move |(x, y)| {
                Rectangle::new([(x, y - half), (x + sample, y + half)], style)
            });
            self.has_labels = true;
        }

        if let Some(edge) = outline {
            let edge = ShapeStyle::from(edge).stroke_width(self.px(1.0));
            self.context
                .draw_series(std::iter::once(Rectangle::new([from, to], edge)))?;
        }
        Ok(())
    }

    fn add_text_box(&mut self, lines: &[String]) -> Result<(), Self::Error> {
        if lines.is_empty() {
            return Ok(());
        }

        let text_style = (FontFamily::SansSerif, 13.0 * self.scale)
            .into_font()
            .color(&BLACK);

        let (mut text_width, mut line_height) = (0, 0);
        for line in lines {
            let (w, h) = self
                .context
                .plotting_area()
                .estimate_text_size(line, &text_style)?;
            text_width = text_width.max(w);
            line_height = line_height.max(h);
        }

        let pad = self.px_i(6.0);
        let offset = self.px_i(10.0);
        let spacing = i32::try_from(line_height).unwrap_or(i32::MAX) + self.px_i(3.0);
        let rows = i32::try_from(lines.len()).unwrap_or(i32::MAX);
        let width = i32::try_from(text_width).unwrap_or(i32::MAX) + 2 * pad;
        let height = spacing * rows + 2 * pad;

        //
        // Anchored to the upper-left corner of the plotting area
        let anchor = (self.x_range.start, self.y_range.end);
        let corners = [(offset, offset), (offset + width, offset + height)];
        self.context.draw_series(std::iter::once(
            EmptyElement::at(anchor) + Rectangle::new(corners, TEXT_BOX_FILL.mix(0.8).filled()),
        ))?;
        self.context.draw_series(std::iter::once(
            EmptyElement::at(anchor)
                + Rectangle::new(corners, ShapeStyle::from(BLACK.mix(0.5)).stroke_width(1)),
        ))?;

        for (row, line) in (0..).zip(lines) {
            let position = (offset + pad, offset + pad + spacing * row);
            self.context.draw_series(std::iter::once(
                EmptyElement::at(anchor) + Text::new(line.clone(), position, text_style.clone()),
            ))?;
        }
        Ok(())
    }

    fn finalize(mut self) -> Result<(), Self::Error> {
        if let (Some(position), true) = (self.legend, self.has_labels) {
            let font_size = 12.0 * self.scale;
            let (area, margin) = (self.px_i(LEGEND_SAMPLE_WIDTH + 10.0), self.px(10.0));
            self.context
                .configure_series_labels()
                .label_font((FontFamily::SansSerif, font_size))
                .legend_area_size(area)
                .margin(margin)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(series_label_position(position))
                .draw()?;
        }
        Ok(())
    }
}

/// Axes, tick labels and grid lines
fn draw_mesh(
    context: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    options: &PlotOptions,
    scale: f64,
    (x_extent, y_extent): (f64, f64),
) -> Result<(), Error> {
    let categories = &options.category_labels;
    let x_formatter = |v: &f64| {
        if categories.is_empty() {
            tick_label(*v, x_extent)
        } else {
            category_label(categories, *v)
        }
    };
    let y_formatter = |v: &f64| tick_label(*v, y_extent);

    let mut mesh = context.configure_mesh();
    mesh.label_style((FontFamily::SansSerif, 12.0 * scale))
        .axis_desc_style((FontFamily::SansSerif, 14.0 * scale))
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05));

    if let Some(x_label) = &options.x_label {
        mesh.x_desc(x_label);
    }

    if let Some(y_label) = &options.y_label {
        mesh.y_desc(y_label);
    }

    if !categories.is_empty() {
        // One tick per half category keeps every slot center on a tick
        mesh.x_labels(2 * categories.len() + 1);
    }

    match options.grid {
        GridLines::Both => {}
        GridLines::YOnly => {
            mesh.disable_x_mesh();
        }
        GridLines::Hidden => {
            mesh.disable_mesh();
        }
    }

    mesh.draw()?;
    Ok(())
}

/// Formats a tick value; `extent` is the width of the axis range
///
/// Ticks that only differ from zero by rounding noise are printed as zero.
fn tick_label(v: f64, extent: f64) -> String {
    let magnitude = v.abs();
    if magnitude <= ZERO_TICK_TOLERANCE * extent.abs() {
        return String::from("0.00");
    }

    if (1e-3..1e4).contains(&magnitude) {
        format!("{v:.2}")
    } else {
        format!("{v:.2e}")
    }
}

/// Names the category whose slot center is at `v`, and leaves every other tick blank
fn category_label(categories: &[String], v: f64) -> String {
    let slot = v.round();
    if (v - slot).abs() > 1e-6 || slot < 1.0 {
        return String::new();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = slot as usize - 1;
    categories.get(index).cloned().unwrap_or_default()
}

/// Shorten label and add [...] if too long
fn shorten(label: &str) -> String {
    if label.chars().count() > MAX_LBL_WIDTH {
        let mut s: String = label.chars().take(MAX_LBL_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(size: f64, scale: f64) -> u32 {
    (size * scale).round().max(1.0) as u32
}

/// Vertices of a five-pointed star centered on the origin, in pixel offsets
#[allow(clippy::cast_possible_truncation)]
fn star_points(radius: u32) -> Vec<(i32, i32)> {
    let outer = f64::from(radius);
    let inner = outer * 0.4;
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = std::f64::consts::PI * f64::from(i) / 5.0 - std::f64::consts::FRAC_PI_2;
            ((r * angle.cos()).round() as i32, (r * angle.sin()).round() as i32)
        })
        .collect()
}

fn series_label_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
    }
}

/// Error occurring during plotting
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error drawing the plot
    #[error("Error drawing plot: {0}")]
    Draw(#[from] DrawingAreaErrorKind<<BitMapBackend<'static> as DrawingBackend>::ErrorType>),
}
