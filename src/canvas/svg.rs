//! SVG canvas.

use std::fmt::Write as _;
use std::path::Path;

use rgb::RGB8;

use super::{Canvas, TEXT_HEIGHT};
use crate::error::Result;

/// Accumulates SVG elements; serialized on [`Canvas::save`].
pub struct SvgCanvas {
    width: usize,
    height: usize,
    thickness: u32,
    body: String,
}

fn css(color: RGB8) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl SvgCanvas {
    /// Create an empty white canvas.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            thickness: 1,
            body: String::with_capacity(16384),
        }
    }

    /// Full SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" shape-rendering="crispEdges">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            svg,
            r##"<rect class="background" width="{}" height="{}" fill="#ffffff"/>"##,
            self.width, self.height
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8, extra: &str) {
        // Pixel centres, so 1px strokes land on whole pixels.
        let _ = writeln!(
            self.body,
            r#"<line x1="{}.5" y1="{}.5" x2="{}.5" y2="{}.5" stroke="{}" stroke-width="{}" stroke-linecap="square"{}/>"#,
            x0,
            y0,
            x1,
            y1,
            css(color),
            self.thickness,
            extra
        );
    }
}

impl Canvas for SvgCanvas {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_line_thickness(&mut self, thickness: u32) {
        self.thickness = thickness.max(1);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: RGB8) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="1" height="1" fill="{}"/>"#,
            x,
            y,
            css(color)
        );
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8) {
        self.line(x0, y0, x1, y1, color, "");
    }

    fn draw_dashed_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8) {
        let saved = self.thickness;
        self.thickness = 1;
        self.line(x0, y0, x1, y1, color, r#" stroke-dasharray="4 4""#);
        self.thickness = saved;
    }

    fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{}.5" y="{}.5" width="{}" height="{}" fill="none" stroke="{}" stroke-width="1"/>"#,
            x0.min(x1),
            y0.min(y1),
            (x1 - x0).abs(),
            (y1 - y0).abs(),
            css(color)
        );
    }

    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            x0.min(x1),
            y0.min(y1),
            (x1 - x0).abs() + 1,
            (y1 - y0).abs() + 1,
            css(color)
        );
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: RGB8) {
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="monospace" font-size="{}" fill="{}">{}</text>"#,
            x,
            y + TEXT_HEIGHT,
            TEXT_HEIGHT + 3,
            css(color),
            escape(text)
        );
    }

    fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_svg())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let mut c = SvgCanvas::new(600, 300);
        c.draw_line(0, 0, 10, 10, RGB8::new(0, 0, 255));
        c.draw_text(5, 5, "a<b", RGB8::new(0, 128, 0));
        let svg = c.to_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains(r##"stroke="#0000ff""##));
        assert!(svg.contains("a&lt;b"));
    }

    #[test]
    fn test_dashes_do_not_inherit_thickness() {
        let mut c = SvgCanvas::new(10, 10);
        c.set_line_thickness(2);
        c.draw_dashed_line(0, 0, 9, 0, RGB8::new(0, 0, 0));
        assert!(c.to_svg().contains(r#"stroke-width="1" stroke-linecap="square" stroke-dasharray"#));
    }
}
