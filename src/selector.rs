//! Calibration pattern selection.
//!
//! The file analyzed first is opened exactly once: the handle returned by
//! [`select`] is used for pattern detection and then handed on to the
//! estimator or extractor, which consumes it.

use std::path::{Path, PathBuf};

use crate::codec::{self, PixelGrid};
use crate::color::ColorSpace;
use crate::error::{Error, Result};
use crate::pattern::CalibrationPattern;
use crate::sampler::Sampler;

/// Top-row intensity at or above which an image is classified as the line pattern.
pub const LINE_DETECT_THRESHOLD: f64 = 99.9;

/// A decoded input image, tied to the path it came from.
#[derive(Debug, Clone)]
pub struct OpenCalibrationSource {
    path: PathBuf,
    grid: PixelGrid,
}

impl OpenCalibrationSource {
    /// Open and decode `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!(" Reading {}", path.display());
        let grid = codec::decode(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            grid,
        })
    }

    /// Wrap an already decoded grid.
    #[must_use]
    pub fn from_grid(path: impl Into<PathBuf>, grid: PixelGrid) -> Self {
        Self {
            path: path.into(),
            grid,
        }
    }

    /// Path the image was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Calibrated sampler over this image.
    #[must_use]
    pub fn sampler(&self, color: ColorSpace, rotated: bool) -> Sampler<'_> {
        Sampler::new(self.grid.as_ref(), color, rotated)
    }
}

/// Result of [`select`]: the pattern to analyze with and the still-open source.
#[derive(Debug)]
pub struct Selection {
    /// Chosen calibration pattern.
    pub pattern: CalibrationPattern,
    /// Source opened for detection, to be reused for analysis.
    pub source: OpenCalibrationSource,
}

/// Classify an image by its top row: any light pixel means line pattern.
pub fn detect_pattern(source: &OpenCalibrationSource, sampler: &Sampler<'_>) -> Result<CalibrationPattern> {
    if sampler.width() == 0 || sampler.height() == 0 {
        return Err(Error::Detection {
            path: source.path().to_path_buf(),
            reason: "image is empty".to_string(),
        });
    }

    let has_light = (0..sampler.width()).any(|x| sampler.sample(x, 0) >= LINE_DETECT_THRESHOLD);
    Ok(if has_light {
        CalibrationPattern::Lines
    } else {
        CalibrationPattern::Dots
    })
}

/// Open `path` and decide which pattern applies: explicit override first, then
/// image content.
pub fn select(
    path: &Path,
    pattern_override: Option<CalibrationPattern>,
    color: ColorSpace,
    rotated: bool,
) -> Result<Selection> {
    let source = OpenCalibrationSource::open(path)?;
    let pattern = match pattern_override {
        Some(p) => p,
        None => {
            let pattern = detect_pattern(&source, &source.sampler(color, rotated))?;
            log::debug!("{}: detected {}", path.display(), pattern.describe());
            pattern
        }
    };
    Ok(Selection { pattern, source })
}
