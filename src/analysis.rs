//! Per-file working state and scale-factor resolution.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pattern::CalibrationPattern;

/// A data point in analysis coordinates.
///
/// `x` is a horizontal offset in source-pixel units (or destination pixels
/// when downscaling), `y` is normalized intensity where the dark reference
/// is 0.0 and the light reference 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Horizontal position.
    pub x: f64,
    /// Normalized amplitude.
    pub y: f64,
}

impl DataPoint {
    /// Create a new point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// User overrides for the scale factor of one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleRequest {
    /// Replaces the natural scale factor when set.
    pub factor: Option<f64>,
    /// Multiplies the (possibly replaced) scale factor when set.
    pub fudge: Option<f64>,
}

impl ScaleRequest {
    /// No overrides.
    #[must_use]
    pub fn natural() -> Self {
        Self::default()
    }

    /// Override the scale factor outright.
    #[must_use]
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = Some(factor);
        self
    }

    /// Apply a fudge multiplier.
    #[must_use]
    pub fn with_fudge(mut self, fudge: f64) -> Self {
        self.fudge = Some(fudge);
        self
    }

    /// Reject factors that would make the geometry meaningless.
    pub fn validate(&self) -> Result<()> {
        for v in [self.factor, self.fudge].into_iter().flatten() {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidScaleFactor(v));
            }
        }
        Ok(())
    }

    /// Effective scale factor given the natural one: override replaces, then fudge multiplies.
    #[must_use]
    pub fn resolve(&self, natural: f64) -> f64 {
        let base = self.factor.unwrap_or(natural);
        base * self.fudge.unwrap_or(1.0)
    }
}

/// Working state for one analyzed input. Dropped once its points are drawn.
#[derive(Debug, Clone)]
pub struct AnalysisState {
    /// Logical width of the observed image.
    pub width: usize,
    /// Logical height of the observed image.
    pub height: usize,
    /// Observed width divided by the source width.
    pub natural_scale_factor: f64,
    /// Scale factor the estimators use.
    pub scale_factor: f64,
    /// Scratch buffer for the line-profile samples.
    pub samples: Vec<f64>,
}

impl AnalysisState {
    /// Resolve scale factors for an observed image of the given logical size.
    pub fn new(
        width: usize,
        height: usize,
        pattern: CalibrationPattern,
        request: &ScaleRequest,
    ) -> Result<Self> {
        request.validate()?;
        let natural_scale_factor = width as f64 / pattern.source_width() as f64;
        let scale_factor = request.resolve(natural_scale_factor);
        log::debug!(
            "scale factor: natural={:.8} effective={:.8}",
            natural_scale_factor,
            scale_factor
        );
        Ok(Self {
            width,
            height,
            natural_scale_factor,
            scale_factor,
            samples: Vec::new(),
        })
    }

    /// Ratio of the effective to the natural scale factor.
    #[must_use]
    pub fn factor_ratio(&self) -> f64 {
        self.scale_factor / self.natural_scale_factor
    }

    /// Whether user overrides moved the scale factor away from the natural one.
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        let ratio = self.factor_ratio();
        !(0.999_999_99..=1.000_000_01).contains(&ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_scale_factor() {
        let state =
            AnalysisState::new(555, 275, CalibrationPattern::Dots, &ScaleRequest::natural()).unwrap();
        assert!((state.natural_scale_factor - 555.0 / 557.0).abs() < 1e-12);
        assert_eq!(state.scale_factor, state.natural_scale_factor);
        assert!(!state.is_overridden());
    }

    #[test]
    fn test_override_then_fudge() {
        let request = ScaleRequest::natural().with_fudge(1.5).with_factor(2.0);
        assert_eq!(request.resolve(0.3), 3.0);

        let state = AnalysisState::new(555, 15, CalibrationPattern::Lines, &request).unwrap();
        assert_eq!(state.natural_scale_factor, 37.0);
        assert_eq!(state.scale_factor, 3.0);
        assert!(state.is_overridden());
    }

    #[test]
    fn test_override_tolerance() {
        let nudged = ScaleRequest::natural().with_fudge(1.000_000_001);
        let state = AnalysisState::new(555, 15, CalibrationPattern::Lines, &nudged).unwrap();
        assert!(!state.is_overridden());

        let fudged = ScaleRequest::natural().with_fudge(1.001);
        let state = AnalysisState::new(555, 15, CalibrationPattern::Lines, &fudged).unwrap();
        assert!(state.is_overridden());
    }

    #[test]
    fn test_fudge_only() {
        let request = ScaleRequest::natural().with_fudge(0.5);
        assert_eq!(request.resolve(4.0), 2.0);
    }

    #[test]
    fn test_invalid_factors_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let request = ScaleRequest::natural().with_factor(bad);
            assert!(matches!(request.validate(), Err(Error::InvalidScaleFactor(_))));
            let request = ScaleRequest::natural().with_fudge(bad);
            assert!(request.validate().is_err());
        }
    }
}
