//! Scale/offset estimation from a resized dot pattern.
//!
//! For every strip and every destination column, the nearest reference dot
//! is located in destination coordinates and the column's (vertically summed)
//! brightness is plotted against its offset from that dot. With 25 strips at
//! 25 different phases the scatter traces the resampling kernel's impulse
//! response at many sub-pixel offsets at once.

use crate::analysis::{AnalysisState, DataPoint};
use crate::color::{DARK_LEVEL, LEVEL_SPAN};
use crate::error::{DimensionError, Result};
use crate::pattern::{
    DOT_HCENTER, DOT_MIN_WIDTH, DOT_NUM_STRIPS, DOT_SPAN, DOT_SRC_HEIGHT, DOT_SRC_WIDTH,
    DOT_STRIP_HEIGHT,
};
use crate::sampler::Sampler;

/// Points for one strip.
#[derive(Debug, Clone, PartialEq)]
pub struct StripPoints {
    /// Strip index (0..25); also its phase shift in source pixels.
    pub strip: usize,
    /// Offset/value points, in destination-column order.
    pub points: Vec<DataPoint>,
}

/// Check that an observed image can be a resized dot pattern.
pub fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if height != DOT_SRC_HEIGHT {
        return Err(DimensionError::WrongHeight {
            expected: DOT_SRC_HEIGHT,
            actual: height,
        }
        .into());
    }
    if width < DOT_MIN_WIDTH {
        return Err(DimensionError::TooNarrow {
            minimum: DOT_MIN_WIDTH,
            actual: width,
        }
        .into());
    }
    Ok(())
}

/// Destination coordinate of source reference column `k`.
#[must_use]
pub fn reference_position(k: usize, scale_factor: f64, observed_width: usize) -> f64 {
    scale_factor * (k as f64 + 0.5 - DOT_SRC_WIDTH as f64 / 2.0) + observed_width as f64 / 2.0 - 0.5
}

/// Source columns of the reference dots in `strip`.
pub fn reference_columns(strip: usize) -> impl Iterator<Item = usize> {
    (DOT_HCENTER + strip..DOT_SRC_WIDTH - DOT_HCENTER).step_by(DOT_SPAN)
}

/// Signed distance from destination column `dst` to the nearest dot of `strip`.
///
/// Ties keep the first (leftmost) candidate.
#[must_use]
pub fn nearest_offset(dst: usize, strip: usize, scale_factor: f64, observed_width: usize) -> f64 {
    let mut offset = f64::INFINITY;
    for k in reference_columns(strip) {
        let candidate = dst as f64 - reference_position(k, scale_factor, observed_width);
        if candidate.abs() < offset.abs() {
            offset = candidate;
        }
    }
    offset
}

/// Largest offset considered close enough to a dot to be meaningful.
///
/// This bound is only known to be right for downscaling. When upscaling,
/// dots are more than `DOT_SPAN` destination pixels apart and some columns
/// between them are discarded even though they carry kernel tails.
#[must_use]
pub fn max_offset(scale_factor: f64) -> f64 {
    scale_factor * DOT_HCENTER as f64
}

/// Estimate points for a single strip.
#[must_use]
pub fn estimate_strip(sampler: &Sampler<'_>, state: &AnalysisState, strip: usize) -> StripPoints {
    let sf = state.scale_factor;
    let limit = max_offset(sf);
    let first_row = strip * DOT_STRIP_HEIGHT;

    let mut points = Vec::new();
    for dst in 0..state.width {
        let mut offset = nearest_offset(dst, strip, sf, state.width);
        if offset.abs() > limit {
            continue;
        }

        // Summing the whole strip undoes any vertical blur the resizer applied.
        let total: f64 = (first_row..first_row + DOT_STRIP_HEIGHT)
            .map(|row| sampler.sample(dst, row) - DARK_LEVEL)
            .sum();
        let mut value = total / LEVEL_SPAN;

        if sf < 1.0 {
            // Shrinking makes each destination pixel cover less source area.
            value /= sf;
        } else {
            offset /= sf;
        }

        points.push(DataPoint::new(offset, value));
    }

    StripPoints { strip, points }
}

/// Run the estimator over all strips of a resized dot pattern.
pub fn estimate(sampler: &Sampler<'_>, state: &AnalysisState) -> Result<Vec<StripPoints>> {
    check_dimensions(state.width, state.height)?;

    let strips: Vec<StripPoints> = (0..DOT_NUM_STRIPS)
        .map(|strip| estimate_strip(sampler, state, strip))
        .collect();

    log::debug!(
        "dot estimator: {} points over {} strips",
        strips.iter().map(|s| s.points.len()).sum::<usize>(),
        strips.len()
    );
    Ok(strips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ScaleRequest;
    use crate::canvas::{GRAPH_HEIGHT, GRAPH_WIDTH, RasterCanvas};
    use crate::color::ColorSpace;
    use crate::error::Error;
    use crate::graph::{GraphMapper, PRIMARY_COLOR, RangeExpansion, plot_points};
    use crate::pattern::{CalibrationPattern, DOT_VCENTER, generate_dot_pattern};
    use imgref::ImgVec;
    use rgb::RGB8;

    const DARK: RGB8 = RGB8::new(50, 50, 50);
    const LIGHT: RGB8 = RGB8::new(250, 250, 250);

    fn state_for(width: usize, height: usize, request: ScaleRequest) -> AnalysisState {
        AnalysisState::new(width, height, CalibrationPattern::Dots, &request).unwrap()
    }

    /// Simulates a perfect point-sampling downscale by 0.5: every dot whose
    /// destination position is integral lands on exactly one pixel.
    fn half_scale_dots() -> ImgVec<RGB8> {
        let width = 279;
        let mut img = ImgVec::new(vec![DARK; width * DOT_SRC_HEIGHT], width, DOT_SRC_HEIGHT);
        for strip in 0..DOT_NUM_STRIPS {
            let row = strip * DOT_STRIP_HEIGHT + DOT_VCENTER;
            for k in reference_columns(strip) {
                let zp = reference_position(k, 0.5, width);
                if zp.fract() == 0.0 {
                    img[(zp as usize, row)] = LIGHT;
                }
            }
        }
        img
    }

    #[test]
    fn test_dimension_checks() {
        assert!(check_dimensions(555, 275).is_ok());
        assert!(check_dimensions(50, 275).is_ok());
        assert!(matches!(
            check_dimensions(555, 274),
            Err(Error::Dimension(DimensionError::WrongHeight { .. }))
        ));
        assert!(matches!(
            check_dimensions(49, 275),
            Err(Error::Dimension(DimensionError::TooNarrow { .. }))
        ));
    }

    #[test]
    fn test_identity_scale_hits_dots_exactly() {
        // At scale 1.0 every reference dot maps onto its own source column.
        for strip in [0, 7, 24] {
            for k in reference_columns(strip) {
                assert_eq!(nearest_offset(k, strip, 1.0, DOT_SRC_WIDTH), 0.0);
            }
        }
    }

    #[test]
    fn test_offset_bound_near_dots() {
        for sf in [0.2, 0.5, 0.9, 1.0] {
            let width = (DOT_SRC_WIDTH as f64 * sf).round() as usize;
            for strip in 0..DOT_NUM_STRIPS {
                for k in reference_columns(strip) {
                    let zp = reference_position(k, sf, width);
                    let dst = zp.round();
                    if dst < 0.0 || dst >= width as f64 {
                        continue;
                    }
                    let offset = nearest_offset(dst as usize, strip, sf, width);
                    assert!(offset.abs() <= max_offset(sf), "sf={} strip={} k={}", sf, strip, k);
                    assert!(offset.abs() <= 0.5 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_far_columns_excluded() {
        // Column 0 at scale 1.0 is 12 + strip columns from the first dot.
        let img = generate_dot_pattern();
        let sampler = Sampler::new(img.as_ref(), ColorSpace::Linear, false);
        let state = state_for(DOT_SRC_WIDTH, DOT_SRC_HEIGHT, ScaleRequest::natural());
        let strip = estimate_strip(&sampler, &state, 24);
        assert!(strip.points.iter().all(|p| p.x.abs() <= max_offset(1.0)));
        assert!(strip.points.len() < DOT_SRC_WIDTH);
    }

    #[test]
    fn test_unscaled_source_is_an_impulse() {
        let img = generate_dot_pattern();
        let sampler = Sampler::new(img.as_ref(), ColorSpace::Linear, false);
        let state = state_for(DOT_SRC_WIDTH, DOT_SRC_HEIGHT, ScaleRequest::natural());
        let strips = estimate(&sampler, &state).unwrap();
        assert_eq!(strips.len(), DOT_NUM_STRIPS);

        for strip in &strips {
            for p in &strip.points {
                if p.x == 0.0 {
                    assert!((p.y - 1.0).abs() < 1e-12);
                } else {
                    assert_eq!(p.y, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_downscale_dimming_compensation() {
        let img = half_scale_dots();
        let sampler = Sampler::new(img.as_ref(), ColorSpace::Linear, false);
        let state = state_for(279, DOT_SRC_HEIGHT, ScaleRequest::natural().with_factor(0.5));
        let strips = estimate(&sampler, &state).unwrap();

        for strip in &strips {
            let expected = reference_columns(strip.strip)
                .filter(|&k| reference_position(k, 0.5, 279).fract() == 0.0)
                .count();
            let peaks: Vec<&DataPoint> = strip.points.iter().filter(|p| p.y > 0.5).collect();
            assert_eq!(peaks.len(), expected, "strip {}", strip.strip);
            for p in peaks {
                assert!(p.x.abs() < 1e-9);
                assert!((p.y - 2.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_minimum_width_stays_on_canvas() {
        let img = ImgVec::new(vec![DARK; 50 * DOT_SRC_HEIGHT], 50, DOT_SRC_HEIGHT);
        let sampler = Sampler::new(img.as_ref(), ColorSpace::Linear, false);
        let state = state_for(50, DOT_SRC_HEIGHT, ScaleRequest::natural());
        let strips = estimate(&sampler, &state).unwrap();
        let limit = max_offset(state.scale_factor);
        for p in strips.iter().flat_map(|s| &s.points) {
            assert!(p.x.abs() <= limit);
            assert_eq!(p.y, 0.0);
        }

        let points: Vec<DataPoint> = strips.into_iter().flat_map(|s| s.points).collect();
        let mapper = GraphMapper::new(GRAPH_WIDTH, GRAPH_HEIGHT, RangeExpansion::Normal);
        for &p in &points {
            let (x, y) = mapper.map_visible(p).unwrap();
            assert!((0..GRAPH_WIDTH as i32).contains(&x));
            assert!((0..GRAPH_HEIGHT as i32).contains(&y));
        }
        let mut canvas = RasterCanvas::new(GRAPH_WIDTH, GRAPH_HEIGHT);
        let drawn = plot_points(&mut canvas, &mapper, &points, PRIMARY_COLOR, true);
        assert_eq!(drawn, points.len());
    }

    #[test]
    fn test_rotation_symmetry() {
        let img = half_scale_dots();
        let pixels = (0..img.width())
            .flat_map(|x| (0..img.height()).map(move |y| (x, y)))
            .map(|(x, y)| img[(x, y)])
            .collect();
        let transposed = ImgVec::new(pixels, img.height(), img.width());

        let request = ScaleRequest::natural().with_factor(0.5);
        let normal = Sampler::new(img.as_ref(), ColorSpace::Linear, false);
        let rotated = Sampler::new(transposed.as_ref(), ColorSpace::Linear, true);
        let a = estimate(&normal, &state_for(normal.width(), normal.height(), request)).unwrap();
        let b = estimate(&rotated, &state_for(rotated.width(), rotated.height(), request)).unwrap();
        assert_eq!(a, b);
    }
}
