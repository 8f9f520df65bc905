//! Color assignment for multi-series figures
//!
//! The palette grows with the number of series:
//! - up to [`SMALL_PALETTE_LIMIT`] series use a fixed list of named colors
//! - up to [`MEDIUM_PALETTE_LIMIT`] series sample the 20-step `tab20` qualitative colormap
//! - beyond that, hues are spread evenly around the color wheel
//!
//! Small fixed palettes run out of distinguishable colors, and a continuous colormap wastes
//! contrast when there are only a handful of lines.
//!
//! Legends are thinned the same way; see [`legend_entries`].
use plotters::style::{Color, HSLColor, RGBAColor, RGBColor};

/// Largest series count served by the named palette
pub const SMALL_PALETTE_LIMIT: usize = 8;

/// Largest series count served by the `tab20` colormap
pub const MEDIUM_PALETTE_LIMIT: usize = 20;

/// Named colors, in the order they are handed out
pub const NAMED_PALETTE: [(&str, RGBColor); SMALL_PALETTE_LIMIT] = [
    ("blue", RGBColor(0, 0, 255)),
    ("red", RGBColor(255, 0, 0)),
    ("green", RGBColor(0, 128, 0)),
    ("purple", RGBColor(128, 0, 128)),
    ("orange", RGBColor(255, 165, 0)),
    ("cyan", RGBColor(0, 255, 255)),
    ("magenta", RGBColor(255, 0, 255)),
    ("black", RGBColor(0, 0, 0)),
];

/// The `tab20` qualitative colormap
pub const TAB20: [RGBColor; MEDIUM_PALETTE_LIMIT] = [
    RGBColor(31, 119, 180),
    RGBColor(174, 199, 232),
    RGBColor(255, 127, 14),
    RGBColor(255, 187, 120),
    RGBColor(44, 160, 44),
    RGBColor(152, 223, 138),
    RGBColor(214, 39, 40),
    RGBColor(255, 152, 150),
    RGBColor(148, 103, 189),
    RGBColor(197, 176, 213),
    RGBColor(140, 86, 75),
    RGBColor(196, 156, 148),
    RGBColor(227, 119, 194),
    RGBColor(247, 182, 210),
    RGBColor(127, 127, 127),
    RGBColor(199, 199, 199),
    RGBColor(188, 189, 34),
    RGBColor(219, 219, 141),
    RGBColor(23, 190, 207),
    RGBColor(158, 218, 229),
];

/// Looks up a color from [`NAMED_PALETTE`] by name
#[must_use]
pub fn named(name: &str) -> Option<RGBAColor> {
    NAMED_PALETTE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| c.to_rgba())
}

/// One color per series, in ascending-id order.
///
/// The same `n` always produces the same sequence.
///
/// ```rust
/// # use gaviz::palette::assign_colors;
/// let rgb = |n| assign_colors(n).iter().map(|c| (c.0, c.1, c.2)).collect::<Vec<_>>();
/// assert_eq!(rgb(5).len(), 5);
/// assert_eq!(rgb(12), rgb(12));
/// ```
#[must_use]
pub fn assign_colors(n: usize) -> Vec<RGBAColor> {
    if n <= SMALL_PALETTE_LIMIT {
        NAMED_PALETTE
            .iter()
            .cycle()
            .take(n)
            .map(|(_, c)| c.to_rgba())
            .collect()
    } else if n <= MEDIUM_PALETTE_LIMIT {
        (0..n).map(|i| sample_tab20(i, n)).collect()
    } else {
        (0..n)
            .map(|i| HSLColor(i as f64 / n as f64, 1.0, 0.5).to_rgba())
            .collect()
    }
}

/// Picks the `tab20` entry at position `i / (n - 1)` along the map
fn sample_tab20(i: usize, n: usize) -> RGBAColor {
    let t = if n > 1 {
        i as f64 / (n - 1) as f64
    } else {
        0.0
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = ((t * MEDIUM_PALETTE_LIMIT as f64) as usize).min(MEDIUM_PALETTE_LIMIT - 1);
    TAB20[index].to_rgba()
}

/// Indices of the series that get a legend entry.
///
/// Every series is listed while the named palette is in use. Past that, every `k`-th
/// series is listed with `k = ceil(n / 8)`, plus the last one. Only the legend is thinned;
/// every series is still drawn.
///
/// ```rust
/// # use gaviz::palette::legend_entries;
/// assert_eq!(legend_entries(3), vec![0, 1, 2]);
/// assert_eq!(legend_entries(20), vec![0, 3, 6, 9, 12, 15, 18, 19]);
/// ```
#[must_use]
pub fn legend_entries(n: usize) -> Vec<usize> {
    if n <= SMALL_PALETTE_LIMIT {
        return (0..n).collect();
    }

    let step = n.div_ceil(SMALL_PALETTE_LIMIT);
    let mut entries: Vec<usize> = (0..n).step_by(step).collect();
    if entries.last() != Some(&(n - 1)) {
        entries.push(n - 1);
    }
    entries
}
