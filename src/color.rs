//! Color-space correction for sampled intensities.
//!
//! The calibration images encode "dark" as 50 and "light" as 250. A resizer
//! that converts sRGB to linear light before filtering (and back afterwards)
//! distorts everything between those two levels. Undoing the transfer
//! function and re-anchoring the two reference levels makes results from
//! linear and sRGB-aware resizers directly comparable.

use serde::{Deserialize, Serialize};

/// Intensity the calibration generator uses for the dark reference.
pub const DARK_LEVEL: f64 = 50.0;

/// Intensity the calibration generator uses for the light reference.
pub const LIGHT_LEVEL: f64 = 250.0;

/// Distance between the two reference levels.
pub const LEVEL_SPAN: f64 = LIGHT_LEVEL - DARK_LEVEL;

/// How sampled channel values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Use raw channel values as-is.
    #[default]
    Linear,
    /// Assume the resizer worked in linear light on sRGB-encoded data.
    Srgb,
}

impl ColorSpace {
    /// Convert a raw 8-bit channel value to a calibrated intensity on the
    /// 0-255 scale.
    #[must_use]
    pub fn correct(self, raw: u8) -> f64 {
        match self {
            Self::Linear => f64::from(raw),
            Self::Srgb => srgb_rescale(srgb_to_linear(f64::from(raw) / 255.0)),
        }
    }
}

/// sRGB transfer function, encoded `[0,1]` to linear light.
#[must_use]
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse sRGB transfer function, linear light to encoded `[0,1]`.
#[must_use]
pub fn linear_to_srgb(v: f64) -> f64 {
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Map a linear-light value so the two reference levels land back on 50 and 250.
fn srgb_rescale(linear: f64) -> f64 {
    let dark = srgb_to_linear(DARK_LEVEL / 255.0);
    let light = srgb_to_linear(LIGHT_LEVEL / 255.0);
    (linear - dark) * (LEVEL_SPAN / (light - dark)) + DARK_LEVEL
}

/// Normalize a calibrated intensity so dark maps to 0.0 and light to 1.0.
#[must_use]
pub fn normalize(intensity: f64) -> f64 {
    (intensity - DARK_LEVEL) / LEVEL_SPAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_roundtrip() {
        for i in 0..=100 {
            let v = f64::from(i) / 100.0;
            let back = srgb_to_linear(linear_to_srgb(v));
            assert!((back - v).abs() < 1e-9, "roundtrip failed at {}: {}", v, back);
        }
    }

    #[test]
    fn test_reference_levels_are_fixed_points() {
        assert!((ColorSpace::Srgb.correct(50) - 50.0).abs() < 1e-9);
        assert!((ColorSpace::Srgb.correct(250) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_midtones_move_down_in_srgb() {
        // Linear light of a mid-grey is darker than its encoded value.
        let corrected = ColorSpace::Srgb.correct(150);
        assert!(corrected < 150.0);
        assert!(corrected > 50.0);
    }

    #[test]
    fn test_linear_passthrough() {
        for raw in [0u8, 50, 128, 250, 255] {
            assert_eq!(ColorSpace::Linear.correct(raw), f64::from(raw));
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(50.0), 0.0);
        assert_eq!(normalize(250.0), 1.0);
        assert_eq!(normalize(150.0), 0.5);
    }
}
