//! Mapping analysis coordinates onto the scope graph, plus its decorations.
//!
//! Logical `x` is an offset in source pixels (one grid unit = 90 px), logical
//! `y` is normalized intensity (0 = dark, 1 = light). The vertical scale
//! depends on the selected [`RangeExpansion`].

use rgb::RGB8;
use serde::{Deserialize, Serialize};

use crate::analysis::DataPoint;
use crate::canvas::{Canvas, TEXT_HEIGHT};

/// Light grey for grid lines.
pub const GRID_COLOR: RGB8 = RGB8::new(192, 192, 192);
/// Axis colour.
pub const AXIS_COLOR: RGB8 = RGB8::new(0, 0, 0);
/// Axis label colour.
pub const LABEL_COLOR: RGB8 = RGB8::new(0, 128, 0);
/// Primary input colour.
pub const PRIMARY_COLOR: RGB8 = RGB8::new(0, 0, 255);
/// Secondary (overlay) input colour.
pub const SECONDARY_COLOR: RGB8 = RGB8::new(224, 64, 64);

const ZERO_X: f64 = 230.0;
const UNIT_X: f64 = 90.0;
const LOGO_TEXT: &str = "ResampleScope";

/// Vertical range presets, trading visible range for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeExpansion {
    /// Roughly -0.4 to 1.1; enough for most filters.
    #[default]
    Normal,
    /// Roughly -1.0 to 1.5; for strong ringing.
    Medium,
    /// Roughly -2.1 to 2.1; for wild overshoot or uncompensated brightness.
    Wide,
}

impl RangeExpansion {
    /// Preset from its 1-based CLI level.
    #[must_use]
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Normal),
            2 => Some(Self::Medium),
            3 => Some(Self::Wide),
            _ => None,
        }
    }

    /// `(zero_y, unit_y)` in canvas pixels.
    #[must_use]
    pub fn vertical(self) -> (f64, f64) {
        match self {
            Self::Normal => (220.0, -200.0),
            Self::Medium => (180.0, -120.0),
            Self::Wide => (150.0, -70.0),
        }
    }
}

/// Affine map from logical analysis coordinates to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphMapper {
    width: i32,
    height: i32,
    zero_x: f64,
    unit_x: f64,
    zero_y: f64,
    unit_y: f64,
}

impl GraphMapper {
    /// Mapper for a canvas of the given size.
    #[must_use]
    pub fn new(width: usize, height: usize, range: RangeExpansion) -> Self {
        let (zero_y, unit_y) = range.vertical();
        Self {
            width: width as i32,
            height: height as i32,
            zero_x: ZERO_X,
            unit_x: UNIT_X,
            zero_y,
            unit_y,
        }
    }

    /// Canvas column for logical `x`.
    #[must_use]
    pub fn x(&self, lx: f64) -> i32 {
        (self.zero_x + lx * self.unit_x).round() as i32
    }

    /// Canvas row for logical `y`.
    #[must_use]
    pub fn y(&self, ly: f64) -> i32 {
        (self.zero_y + ly * self.unit_y).round() as i32
    }

    /// Canvas position for a point, whether or not it is visible.
    #[must_use]
    pub fn to_screen(&self, p: DataPoint) -> (i32, i32) {
        (self.x(p.x), self.y(p.y))
    }

    /// Whether a canvas position lies on the surface.
    #[must_use]
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    /// Canvas position for a point, or `None` if it falls off the surface.
    #[must_use]
    pub fn map_visible(&self, p: DataPoint) -> Option<(i32, i32)> {
        let (x, y) = self.to_screen(p);
        self.is_visible(x, y).then_some((x, y))
    }

    /// Canvas width.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Canvas height.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }
}

/// Joins successive points with line segments.
///
/// The first point, and the first point after an invisible one, starts a new
/// run without a connecting segment.
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    last: Option<(i32, i32)>,
}

impl Polyline {
    /// Start a new, unconnected polyline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point, drawing a segment from the previous one if there is one.
    /// Returns whether a segment was drawn.
    pub fn line_to(
        &mut self,
        canvas: &mut dyn Canvas,
        mapper: &GraphMapper,
        p: DataPoint,
        color: RGB8,
    ) -> bool {
        let Some(pos) = mapper.map_visible(p) else {
            self.last = None;
            return false;
        };
        let drew = match self.last {
            Some((lx, ly)) => {
                canvas.draw_line(lx, ly, pos.0, pos.1, color);
                true
            }
            None => {
                canvas.set_pixel(pos.0, pos.1, color);
                false
            }
        };
        self.last = Some(pos);
        drew
    }
}

/// Plot scattered points; invisible ones are dropped. Returns how many were drawn.
pub fn plot_points(
    canvas: &mut dyn Canvas,
    mapper: &GraphMapper,
    points: &[DataPoint],
    color: RGB8,
    thick: bool,
) -> usize {
    let mut drawn = 0;
    for &p in points {
        if let Some((x, y)) = mapper.map_visible(p) {
            if thick {
                canvas.fill_rect(x, y, x + 1, y + 1, color);
            } else {
                canvas.set_pixel(x, y, color);
            }
            drawn += 1;
        }
    }
    drawn
}

/// Join points into a polyline. Returns how many segments were drawn.
pub fn plot_polyline(
    canvas: &mut dyn Canvas,
    mapper: &GraphMapper,
    points: &[DataPoint],
    color: RGB8,
    thick: bool,
) -> usize {
    canvas.set_line_thickness(if thick { 2 } else { 1 });
    let mut line = Polyline::new();
    let mut segments = 0;
    for &p in points {
        if line.line_to(canvas, mapper, p, color) {
            segments += 1;
        }
    }
    canvas.set_line_thickness(1);
    segments
}

/// Grid at integers and half-integers, the axes, and the 0/1 labels.
pub fn draw_grid(canvas: &mut dyn Canvas, mapper: &GraphMapper, border: RGB8) {
    let (w, h) = (mapper.width(), mapper.height());

    for i in -10..=10 {
        let half = f64::from(i) + 0.5;
        canvas.draw_dashed_line(mapper.x(half), 0, mapper.x(half), h, GRID_COLOR);
        canvas.draw_dashed_line(0, mapper.y(half), w, mapper.y(half), GRID_COLOR);
    }

    for i in -10..=10 {
        let v = f64::from(i);
        canvas.draw_line(mapper.x(v), 0, mapper.x(v), h, GRID_COLOR);
        canvas.draw_line(0, mapper.y(v), w, mapper.y(v), GRID_COLOR);
    }

    canvas.draw_line(mapper.x(0.0), 0, mapper.x(0.0), h, AXIS_COLOR);
    canvas.draw_line(0, mapper.y(0.0), w, mapper.y(0.0), AXIS_COLOR);

    for i in 0..=1 {
        let label = i.to_string();
        let v = f64::from(i);
        canvas.draw_text(mapper.x(v) - 6, h - 14, &label, LABEL_COLOR);
        canvas.draw_text(3, mapper.y(v) - 12, &label, LABEL_COLOR);
    }

    canvas.draw_rect(0, 0, w - 1, h - 1, border);
}

/// Program name in the bottom-right corner.
pub fn draw_logo(canvas: &mut dyn Canvas, mapper: &GraphMapper, border: RGB8) {
    let (w, h) = (mapper.width(), mapper.height());
    canvas.fill_rect(w - 95, h - 15, w - 1, h - 1, border);
    canvas.draw_text(w - 93, h - 12, LOGO_TEXT, RGB8::new(255, 255, 255));
}

/// Legend entry for the `slot`-th graph: colour swatch and label.
pub fn draw_legend(canvas: &mut dyn Canvas, mapper: &GraphMapper, slot: usize, label: &str, color: RGB8) {
    let y = mapper.height() - 19 - 14 * slot as i32;
    canvas.draw_line(5, y + TEXT_HEIGHT / 2 + 3, 13, y + TEXT_HEIGHT / 2 + 3, color);
    canvas.draw_text(17, y + 3, label, color);
}

/// Legend label, noting the factor ratio when the scale was overridden.
#[must_use]
pub fn legend_label(name: &str, overridden_ratio: Option<f64>) -> String {
    match overridden_ratio {
        Some(ff) => format!("{} (factor={:.8})", name, ff),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RasterCanvas;

    fn mapper() -> GraphMapper {
        GraphMapper::new(600, 300, RangeExpansion::Normal)
    }

    #[test]
    fn test_origin_and_units() {
        let m = mapper();
        assert_eq!(m.to_screen(DataPoint::new(0.0, 0.0)), (230, 220));
        assert_eq!(m.to_screen(DataPoint::new(1.0, 1.0)), (320, 20));
        assert_eq!(m.to_screen(DataPoint::new(-0.5, 0.5)), (185, 120));
    }

    #[test]
    fn test_value_two_is_off_canvas_by_default() {
        let m = mapper();
        assert_eq!(m.map_visible(DataPoint::new(0.0, 2.0)), None);

        let wide = GraphMapper::new(600, 300, RangeExpansion::Wide);
        assert!(wide.map_visible(DataPoint::new(0.0, 2.0)).is_some());
    }

    #[test]
    fn test_presets_widen_range() {
        let visible_top = |r: RangeExpansion| {
            let (zero, unit) = r.vertical();
            -zero / unit
        };
        assert!(visible_top(RangeExpansion::Normal) < visible_top(RangeExpansion::Medium));
        assert!(visible_top(RangeExpansion::Medium) < visible_top(RangeExpansion::Wide));
        assert_eq!(RangeExpansion::from_level(2), Some(RangeExpansion::Medium));
        assert_eq!(RangeExpansion::from_level(4), None);
    }

    #[test]
    fn test_polyline_first_point_unconnected() {
        let m = mapper();
        let mut canvas = RasterCanvas::new(600, 300);
        let pts = [
            DataPoint::new(-1.0, 0.0),
            DataPoint::new(0.0, 1.0),
            DataPoint::new(1.0, 0.0),
        ];
        assert_eq!(plot_polyline(&mut canvas, &m, &pts, PRIMARY_COLOR, false), 2);
    }

    #[test]
    fn test_polyline_breaks_at_invisible_points() {
        let m = mapper();
        let mut canvas = RasterCanvas::new(600, 300);
        let pts = [
            DataPoint::new(-1.0, 0.0),
            DataPoint::new(-0.5, 5.0),
            DataPoint::new(0.0, 0.0),
            DataPoint::new(0.5, 0.0),
        ];
        assert_eq!(plot_polyline(&mut canvas, &m, &pts, PRIMARY_COLOR, false), 1);
        // Nothing was drawn above the visible range.
        assert_eq!(canvas.pixel(m.x(-0.75), 0), Some(RGB8::new(255, 255, 255)));
    }

    #[test]
    fn test_scatter_drops_invisible() {
        let m = mapper();
        let mut canvas = RasterCanvas::new(600, 300);
        let pts = [DataPoint::new(0.0, 1.0), DataPoint::new(0.0, 2.0), DataPoint::new(50.0, 0.0)];
        assert_eq!(plot_points(&mut canvas, &m, &pts, PRIMARY_COLOR, false), 1);
        assert_eq!(canvas.pixel(230, 20), Some(PRIMARY_COLOR));
    }

    #[test]
    fn test_grid_draws_axes_and_border() {
        let m = mapper();
        let mut canvas = RasterCanvas::new(600, 300);
        let border = RGB8::new(144, 192, 144);
        draw_grid(&mut canvas, &m, border);
        assert_eq!(canvas.pixel(230, 100), Some(AXIS_COLOR));
        assert_eq!(canvas.pixel(400, 220), Some(AXIS_COLOR));
        assert_eq!(canvas.pixel(0, 150), Some(border));
        assert_eq!(canvas.pixel(599, 299), Some(border));
    }

    #[test]
    fn test_legend_label() {
        assert_eq!(legend_label("pd", None), "pd");
        assert_eq!(legend_label("pd", Some(0.5)), "pd (factor=0.50000000)");
    }
}
