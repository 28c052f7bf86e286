//! Calibration pattern command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn run(dir: &Path) -> Result<()> {
    rscope::pattern::write_calibration_set(dir)
        .with_context(|| format!("Failed to write calibration patterns to {}", dir.display()))
}
