//! Drawing surfaces for scope graphs.
//!
//! The graph code only talks to the [`Canvas`] trait. Two backends exist:
//!
//! - [`RasterCanvas`]: an RGB8 bitmap written through the image codec
//! - [`SvgCanvas`]: the same primitives as SVG elements (feature `svg`)

mod raster;
#[cfg(feature = "svg")]
mod svg;

use std::path::Path;

use rgb::RGB8;

use crate::error::Result;

pub use raster::RasterCanvas;
#[cfg(feature = "svg")]
pub use svg::SvgCanvas;

/// Width of every scope graph.
pub const GRAPH_WIDTH: usize = 600;
/// Height of every scope graph.
pub const GRAPH_HEIGHT: usize = 300;

/// Height of one line of label text.
pub const TEXT_HEIGHT: i32 = 8;

/// Drawing primitives used by the graph renderer. Coordinates are pixels with
/// the origin at the top left; anything off the surface is silently skipped.
pub trait Canvas {
    /// Surface width in pixels.
    fn width(&self) -> usize;

    /// Surface height in pixels.
    fn height(&self) -> usize;

    /// Thickness used by subsequent [`Canvas::draw_line`] calls.
    fn set_line_thickness(&mut self, thickness: u32);

    /// Set a single pixel.
    fn set_pixel(&mut self, x: i32, y: i32, color: RGB8);

    /// Straight line between two points, inclusive.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8);

    /// Dashed line between two points.
    fn draw_dashed_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8);

    /// Rectangle outline; corners inclusive.
    fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8);

    /// Filled rectangle; corners inclusive.
    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8);

    /// Text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: RGB8);

    /// Write the surface to `path`.
    fn save(&self, path: &Path) -> Result<()>;
}

/// Pick a backend from the output extension: `.svg` gets vector output when
/// the `svg` feature is enabled, everything else a raster.
#[must_use]
pub fn for_output(path: &Path) -> Box<dyn Canvas> {
    #[cfg(feature = "svg")]
    {
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if is_svg {
            return Box::new(SvgCanvas::new(GRAPH_WIDTH, GRAPH_HEIGHT));
        }
    }
    #[cfg(not(feature = "svg"))]
    let _ = path;

    Box::new(RasterCanvas::new(GRAPH_WIDTH, GRAPH_HEIGHT))
}
