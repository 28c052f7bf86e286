//! Bitmap canvas.

use std::path::Path;

use font8x8::{BASIC_FONTS, UnicodeFonts};
use imgref::{ImgRef, ImgVec};
use rgb::RGB8;

use super::Canvas;
use crate::codec;
use crate::error::Result;

/// Pixels drawn, then skipped, per dash.
const DASH_LENGTH: usize = 4;

/// RGB8 bitmap initialised to white.
pub struct RasterCanvas {
    img: ImgVec<RGB8>,
    thickness: u32,
}

impl RasterCanvas {
    /// Create a white canvas.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            img: ImgVec::new(vec![RGB8::new(255, 255, 255); width * height], width, height),
            thickness: 1,
        }
    }

    /// Pixel at `(x, y)`, or `None` off the surface.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<RGB8> {
        self.index(x, y).map(|(x, y)| self.img[(x, y)])
    }

    /// Borrow the bitmap.
    #[must_use]
    pub fn as_img(&self) -> ImgRef<'_, RGB8> {
        self.img.as_ref()
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.img.width() && y < self.img.height()).then_some((x, y))
    }

    fn plot(&mut self, x: i32, y: i32, color: RGB8) {
        if let Some(idx) = self.index(x, y) {
            self.img[idx] = color;
        }
    }

    /// Plot a thickness-sized square centred on `(x, y)`.
    fn plot_thick(&mut self, x: i32, y: i32, color: RGB8) {
        let t = self.thickness.max(1) as i32;
        let start = -(t - 1) / 2;
        for dy in start..start + t {
            for dx in start..start + t {
                self.plot(x + dx, y + dy, color);
            }
        }
    }

    /// Bresenham walk, calling `f` with each point and its step index.
    fn walk_line(x0: i32, y0: i32, x1: i32, y1: i32, mut f: impl FnMut(usize, i32, i32)) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        let mut step = 0;
        loop {
            f(step, x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1;
        }
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> usize {
        self.img.width()
    }

    fn height(&self) -> usize {
        self.img.height()
    }

    fn set_line_thickness(&mut self, thickness: u32) {
        self.thickness = thickness.max(1);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: RGB8) {
        self.plot(x, y, color);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8) {
        let mut points = Vec::new();
        Self::walk_line(x0, y0, x1, y1, |_, x, y| points.push((x, y)));
        for (x, y) in points {
            self.plot_thick(x, y, color);
        }
    }

    fn draw_dashed_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8) {
        let mut points = Vec::new();
        Self::walk_line(x0, y0, x1, y1, |step, x, y| {
            if (step / DASH_LENGTH) % 2 == 0 {
                points.push((x, y));
            }
        });
        for (x, y) in points {
            self.plot(x, y, color);
        }
    }

    fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.plot(x, y0, color);
            self.plot(x, y1, color);
        }
        for y in y0.min(y1)..=y0.max(y1) {
            self.plot(x0, y, color);
            self.plot(x1, y, color);
        }
    }

    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: RGB8) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.plot(x, y, color);
            }
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: RGB8) {
        let mut pen_x = x;
        for ch in text.chars() {
            let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'));
            if let Some(rows) = glyph {
                for (gy, bits) in rows.iter().enumerate() {
                    for gx in 0..8 {
                        if bits & (1 << gx) != 0 {
                            self.plot(pen_x + gx, y + gy as i32, color);
                        }
                    }
                }
            }
            pen_x += 7;
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        codec::encode(self.img.as_ref(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: RGB8 = RGB8::new(255, 255, 255);
    const BLACK: RGB8 = RGB8::new(0, 0, 0);

    #[test]
    fn test_starts_white() {
        let c = RasterCanvas::new(10, 5);
        assert!(c.as_img().pixels().all(|p| p == WHITE));
    }

    #[test]
    fn test_line_endpoints_inclusive() {
        let mut c = RasterCanvas::new(10, 10);
        c.draw_line(1, 1, 8, 5, BLACK);
        assert_eq!(c.pixel(1, 1), Some(BLACK));
        assert_eq!(c.pixel(8, 5), Some(BLACK));
        assert_eq!(c.pixel(9, 9), Some(WHITE));
    }

    #[test]
    fn test_thick_line_widens() {
        let mut c = RasterCanvas::new(10, 10);
        c.set_line_thickness(2);
        c.draw_line(2, 4, 7, 4, BLACK);
        assert_eq!(c.pixel(4, 4), Some(BLACK));
        assert_eq!(c.pixel(4, 5), Some(BLACK));
        assert_eq!(c.pixel(4, 6), Some(WHITE));
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut c = RasterCanvas::new(20, 1);
        c.draw_dashed_line(0, 0, 19, 0, BLACK);
        assert_eq!(c.pixel(0, 0), Some(BLACK));
        assert_eq!(c.pixel(3, 0), Some(BLACK));
        assert_eq!(c.pixel(4, 0), Some(WHITE));
        assert_eq!(c.pixel(8, 0), Some(BLACK));
    }

    #[test]
    fn test_off_canvas_is_ignored() {
        let mut c = RasterCanvas::new(4, 4);
        c.set_pixel(-1, 2, BLACK);
        c.set_pixel(4, 0, BLACK);
        c.draw_line(-10, -10, 10, 10, BLACK);
        assert_eq!(c.pixel(-1, 0), None);
        assert_eq!(c.pixel(2, 2), Some(BLACK));
    }

    #[test]
    fn test_rects() {
        let mut c = RasterCanvas::new(10, 10);
        c.draw_rect(0, 0, 9, 9, BLACK);
        assert_eq!(c.pixel(0, 5), Some(BLACK));
        assert_eq!(c.pixel(5, 5), Some(WHITE));
        c.fill_rect(3, 3, 5, 5, BLACK);
        assert_eq!(c.pixel(4, 4), Some(BLACK));
    }

    #[test]
    fn test_text_marks_pixels() {
        let mut c = RasterCanvas::new(20, 10);
        c.draw_text(1, 1, "1", BLACK);
        assert!(c.as_img().pixels().any(|p| p == BLACK));
    }
}
