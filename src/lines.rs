//! Kernel profile extraction from a resized line pattern.

use crate::analysis::{AnalysisState, DataPoint};
use crate::color::normalize;
use crate::error::{DimensionError, Result};
use crate::pattern::LINE_MIN_HEIGHT;
use crate::sampler::Sampler;

/// A 1-D kernel profile, one point per destination column.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Points in column order, ready to be joined into a polyline.
    pub points: Vec<DataPoint>,
    /// Area under the uncompensated profile divided by the scale factor.
    /// A filter that preserves brightness gives 1.0.
    pub area: f64,
}

/// Check that an observed image can be a resized line pattern.
pub fn check_dimensions(height: usize) -> Result<()> {
    if height < LINE_MIN_HEIGHT {
        return Err(DimensionError::TooShort {
            minimum: LINE_MIN_HEIGHT,
            actual: height,
        }
        .into());
    }
    Ok(())
}

/// Row read for column `x`: cycles through the three rows around the middle,
/// so scanlines that differ from one another show up as a jagged profile.
#[must_use]
pub fn sample_row(x: usize, height: usize) -> usize {
    height / 2 + x % 3 - 1
}

/// Copy the analyzed samples into `state.samples`.
pub fn read_samples(sampler: &Sampler<'_>, state: &mut AnalysisState) {
    state.samples.clear();
    state
        .samples
        .extend((0..state.width).map(|x| sampler.sample(x, sample_row(x, state.height))));
}

/// Build the profile from samples already read into `state`.
#[must_use]
pub fn profile_from_samples(state: &AnalysisState) -> Profile {
    let sf = state.scale_factor;
    let half_width = state.width as f64 / 2.0;

    let mut total = 0.0;
    let points = state
        .samples
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let mut yp = normalize(v);
            let mut xp = (i as f64 + 0.5) - half_width;
            total += yp;
            if sf < 1.0 {
                yp /= sf;
            } else {
                xp /= sf;
            }
            DataPoint::new(xp, yp)
        })
        .collect();

    Profile {
        points,
        area: total / sf,
    }
}

/// Run the extractor over a resized line pattern.
pub fn extract(sampler: &Sampler<'_>, state: &mut AnalysisState) -> Result<Profile> {
    check_dimensions(state.height)?;
    read_samples(sampler, state);
    let profile = profile_from_samples(state);
    log::info!("  Area = {:.6}", profile.area);
    Ok(profile)
}
