//! Report types for analysis runs.
//!
//! The graph is the main output, but the numbers behind it can be saved as
//! JSON (everything) or CSV (one row per point) for post-processing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisState, DataPoint};
use crate::color::ColorSpace;
use crate::error::Result;
use crate::pattern::CalibrationPattern;

/// Which slot an input occupies on the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRole {
    /// Drawn last, on top.
    Primary,
    /// Overlay drawn first.
    Secondary,
}

/// Outcome of analyzing one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Input path.
    pub path: PathBuf,
    /// Legend label.
    pub label: String,
    /// Slot on the graph.
    pub role: InputRole,
    /// Logical width of the image (0 if it could not be read).
    pub width: usize,
    /// Logical height of the image.
    pub height: usize,
    /// Width ratio against the calibration source.
    pub natural_scale_factor: Option<f64>,
    /// Scale factor used by the analysis.
    pub scale_factor: Option<f64>,
    /// Area under the line profile (line pattern only).
    pub area: Option<f64>,
    /// Analysis points, before visibility filtering.
    pub points: Vec<DataPoint>,
    /// How many points (or segments) ended up on the canvas.
    pub drawn: usize,
    /// Error message if the analysis failed.
    pub error: Option<String>,
}

impl FileReport {
    /// Empty report for an input about to be analyzed.
    #[must_use]
    pub fn new(path: PathBuf, label: String, role: InputRole) -> Self {
        Self {
            path,
            label,
            role,
            width: 0,
            height: 0,
            natural_scale_factor: None,
            scale_factor: None,
            area: None,
            points: Vec::new(),
            drawn: 0,
            error: None,
        }
    }

    /// Copy dimensions and scale factors from the working state.
    pub fn record_state(&mut self, state: &AnalysisState) {
        self.width = state.width;
        self.height = state.height;
        self.natural_scale_factor = Some(state.natural_scale_factor);
        self.scale_factor = Some(state.scale_factor);
    }

    /// Whether this input was analyzed successfully.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Report for a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Pattern every input was analyzed as.
    pub pattern: CalibrationPattern,
    /// Color correction applied.
    pub color_space: ColorSpace,
    /// Whether inputs were read transposed.
    pub rotated: bool,
    /// Graph output path.
    pub output: PathBuf,
    /// Per-input results, in drawing order.
    pub files: Vec<FileReport>,
    /// When this report was generated.
    #[serde(with = "chrono_serde")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl RunReport {
    /// Create an empty run report.
    #[must_use]
    pub fn new(pattern: CalibrationPattern, color_space: ColorSpace, rotated: bool, output: PathBuf) -> Self {
        Self {
            pattern,
            color_space,
            rotated,
            output,
            files: Vec::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// True when every input was analyzed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.files.iter().all(FileReport::succeeded)
    }

    /// Report for the primary input.
    #[must_use]
    pub fn primary(&self) -> Option<&FileReport> {
        self.files.iter().find(|f| f.role == InputRole::Primary)
    }

    /// Write the full report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Write every analysis point as CSV.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record(["file", "label", "role", "x", "y"])?;

        for file in &self.files {
            let role = match file.role {
                InputRole::Primary => "primary",
                InputRole::Secondary => "secondary",
            }
            .to_string();
            for p in &file.points {
                wtr.write_record([
                    &file.path.display().to_string(),
                    &file.label,
                    &role,
                    &format!("{:.6}", p.x),
                    &format!("{:.6}", p.y),
                ])?;
            }
        }

        wtr.flush()?;
        Ok(())
    }
}

mod chrono_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        dt.to_rfc3339().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
