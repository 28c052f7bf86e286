//! Run orchestration: configuration, per-input analysis, and drawing.
//!
//! A run analyzes up to two resized images of the same calibration pattern
//! and draws both onto one graph. The secondary input is drawn first so the
//! primary ends up on top. Inputs are processed strictly one at a time; each
//! decoded image is dropped before the next one is opened.

use std::path::PathBuf;

use rgb::RGB8;

use crate::analysis::{AnalysisState, ScaleRequest};
use crate::canvas::{self, Canvas};
use crate::color::ColorSpace;
use crate::dots;
use crate::error::Result;
use crate::graph::{self, GraphMapper, PRIMARY_COLOR, RangeExpansion, SECONDARY_COLOR};
use crate::lines;
use crate::pattern::CalibrationPattern;
use crate::report::{FileReport, InputRole, RunReport};
use crate::selector::{self, OpenCalibrationSource};

/// One input image and how to present it.
#[derive(Debug, Clone)]
pub struct InfileInfo {
    /// Path to the resized calibration image.
    pub path: PathBuf,
    /// Friendly name for the legend; defaults to the file stem.
    pub name: Option<String>,
    /// Scale factor overrides.
    pub scale: ScaleRequest,
    /// Draw with thicker lines.
    pub thick: bool,
    /// Display colour; defaults by role when `None`.
    pub color: Option<RGB8>,
}

impl InfileInfo {
    /// Input with default presentation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            scale: ScaleRequest::natural(),
            thick: false,
            color: None,
        }
    }

    /// Set the legend name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set scale factor overrides.
    #[must_use]
    pub fn with_scale(mut self, scale: ScaleRequest) -> Self {
        self.scale = scale;
        self
    }

    /// Draw with thick lines.
    #[must_use]
    pub fn with_thick(mut self, thick: bool) -> Self {
        self.thick = thick;
        self
    }

    /// Override the display colour.
    #[must_use]
    pub fn with_color(mut self, color: RGB8) -> Self {
        self.color = Some(color);
        self
    }

    /// Legend label: the friendly name, or the file name without its extension.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Graph output path.
    pub output: PathBuf,
    /// Pattern override; detected from the first analyzed image when `None`.
    pub pattern: Option<CalibrationPattern>,
    /// Color correction for all inputs.
    pub color_space: ColorSpace,
    /// Read images transposed to measure vertical resampling.
    pub rotated: bool,
    /// Vertical range preset.
    pub range: RangeExpansion,
    /// Draw the program name in the corner.
    pub include_logo: bool,
    /// Primary input, drawn on top.
    pub primary: InfileInfo,
    /// Optional overlay input.
    pub secondary: Option<InfileInfo>,
}

impl RunConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder(primary: InfileInfo, output: impl Into<PathBuf>) -> RunConfigBuilder {
        RunConfigBuilder {
            output: output.into(),
            primary,
            secondary: None,
            pattern: None,
            color_space: ColorSpace::default(),
            rotated: false,
            range: RangeExpansion::default(),
            include_logo: true,
        }
    }

    /// Inputs in drawing order, with their roles and colours.
    fn inputs(&self) -> Vec<InputSlot<'_>> {
        let secondary = self.secondary.as_ref().map(|info| (info, InputRole::Secondary, SECONDARY_COLOR));
        let primary = Some((&self.primary, InputRole::Primary, PRIMARY_COLOR));
        secondary
            .into_iter()
            .chain(primary)
            .enumerate()
            .map(|(slot, (info, role, default_color))| InputSlot {
                info,
                role,
                color: info.color.unwrap_or(default_color),
                slot,
            })
            .collect()
    }
}

/// One input in drawing order, with its legend slot.
#[derive(Debug, Clone, Copy)]
struct InputSlot<'a> {
    info: &'a InfileInfo,
    role: InputRole,
    color: RGB8,
    slot: usize,
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    output: PathBuf,
    primary: InfileInfo,
    secondary: Option<InfileInfo>,
    pattern: Option<CalibrationPattern>,
    color_space: ColorSpace,
    rotated: bool,
    range: RangeExpansion,
    include_logo: bool,
}

impl RunConfigBuilder {
    /// Add an overlay input.
    #[must_use]
    pub fn secondary(mut self, secondary: InfileInfo) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Force a calibration pattern instead of detecting it.
    #[must_use]
    pub fn pattern(mut self, pattern: CalibrationPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Set the color correction.
    #[must_use]
    pub fn color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    /// Read inputs transposed.
    #[must_use]
    pub fn rotated(mut self, rotated: bool) -> Self {
        self.rotated = rotated;
        self
    }

    /// Set the vertical range preset.
    #[must_use]
    pub fn range(mut self, range: RangeExpansion) -> Self {
        self.range = range;
        self
    }

    /// Include or omit the logo.
    #[must_use]
    pub fn include_logo(mut self, include_logo: bool) -> Self {
        self.include_logo = include_logo;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> RunConfig {
        RunConfig {
            output: self.output,
            pattern: self.pattern,
            color_space: self.color_space,
            rotated: self.rotated,
            range: self.range,
            include_logo: self.include_logo,
            primary: self.primary,
            secondary: self.secondary,
        }
    }
}

/// Drawing context shared by the inputs of one run.
struct GraphTarget<'a> {
    canvas: &'a mut dyn Canvas,
    mapper: GraphMapper,
}

/// Analyze every input and draw onto `canvas`.
///
/// Fails only if the pattern cannot be determined. Failures of individual
/// inputs are logged and recorded in the returned report.
pub fn run(config: &RunConfig, canvas: &mut dyn Canvas) -> Result<RunReport> {
    match config.pattern {
        Some(pattern) => run_with_source(config, canvas, pattern, None),
        None => {
            let first = config.secondary.as_ref().unwrap_or(&config.primary);
            let selection = selector::select(&first.path, None, config.color_space, config.rotated)?;
            run_with_source(config, canvas, selection.pattern, Some(selection.source))
        }
    }
}

/// Draw the graph, handing `opened` to the input it was read from instead of
/// opening that file again.
fn run_with_source(
    config: &RunConfig,
    canvas: &mut dyn Canvas,
    pattern: CalibrationPattern,
    opened: Option<OpenCalibrationSource>,
) -> Result<RunReport> {
    log::info!("Writing {} [{}]", config.output.display(), pattern.describe());

    let mut report = RunReport::new(pattern, config.color_space, config.rotated, config.output.clone());

    let mapper = GraphMapper::new(canvas.width(), canvas.height(), config.range);
    let border = pattern.border_color();
    graph::draw_grid(canvas, &mapper, border);
    if config.include_logo {
        graph::draw_logo(canvas, &mapper, border);
    }

    let mut target = GraphTarget { canvas, mapper };
    let mut pending = opened;

    for input in config.inputs() {
        let mut file = FileReport::new(input.info.path.clone(), input.info.label(), input.role);

        let source = match pending.take() {
            Some(source) if source.path() == input.info.path => Ok(source),
            _ => OpenCalibrationSource::open(&input.info.path),
        };

        let outcome = source
            .and_then(|source| analyze_input(&source, pattern, input, config, &mut target, &mut file));
        if let Err(e) = outcome {
            log::warn!("* Error: {}", e);
            file.error = Some(e.to_string());
        }
        report.files.push(file);
    }

    Ok(report)
}

/// Analyze one opened input and draw its legend entry and data.
fn analyze_input(
    source: &OpenCalibrationSource,
    pattern: CalibrationPattern,
    input: InputSlot<'_>,
    config: &RunConfig,
    target: &mut GraphTarget<'_>,
    file: &mut FileReport,
) -> Result<()> {
    let sampler = source.sampler(config.color_space, config.rotated);
    let mut state = AnalysisState::new(sampler.width(), sampler.height(), pattern, &input.info.scale)?;
    file.record_state(&state);

    let ratio = state.is_overridden().then(|| state.factor_ratio());
    let label = graph::legend_label(&file.label, ratio);
    let (color, thick) = (input.color, input.info.thick);

    match pattern {
        CalibrationPattern::Dots => {
            let strips = dots::estimate(&sampler, &state)?;
            graph::draw_legend(target.canvas, &target.mapper, input.slot, &label, color);
            file.points = strips.into_iter().flat_map(|s| s.points).collect();
            file.drawn = graph::plot_points(target.canvas, &target.mapper, &file.points, color, thick);
        }
        CalibrationPattern::Lines => {
            let profile = lines::extract(&sampler, &mut state)?;
            graph::draw_legend(target.canvas, &target.mapper, input.slot, &label, color);
            file.drawn = graph::plot_polyline(target.canvas, &target.mapper, &profile.points, color, thick);
            file.points = profile.points;
            file.area = Some(profile.area);
        }
    }

    log::debug!(
        "{}: {} points, {} drawn",
        input.info.path.display(),
        file.points.len(),
        file.drawn
    );
    Ok(())
}

/// Run with a canvas chosen from the output extension, then save the graph.
///
/// The graph is written even when some inputs failed; check
/// [`RunReport::succeeded`].
pub fn run_to_file(config: &RunConfig) -> Result<RunReport> {
    let mut canvas = canvas::for_output(&config.output);
    let report = run(config, canvas.as_mut())?;
    canvas.save(&config.output)?;
    Ok(report)
}
