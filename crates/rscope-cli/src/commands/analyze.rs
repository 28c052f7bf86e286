//! Analysis command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use rscope::{CalibrationPattern, ColorSpace, InfileInfo, RangeExpansion, RunConfig, ScaleRequest};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input image, optional overlay image, then the output graph (.png or .svg)
    #[arg(required = true, num_args = 2..=3, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Treat the input as the dot pattern
    #[arg(long, conflicts_with = "pl")]
    pd: bool,

    /// Treat the input as the line pattern
    #[arg(long)]
    pl: bool,

    /// Use this scale factor instead of the one implied by the image width
    #[arg(long, value_name = "F")]
    sf: Option<f64>,

    /// Multiply the scale factor by this
    #[arg(long, value_name = "F")]
    ff: Option<f64>,

    /// Convert samples from sRGB to linear light
    #[arg(long)]
    srgb: bool,

    /// Read images transposed, to measure vertical resizing
    #[arg(short, long)]
    rotated: bool,

    /// Vertical range: 1 normal, 2 medium, 3 wide
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    range: u8,

    /// Draw the input with thick lines
    #[arg(long)]
    thick: bool,

    /// Draw the overlay with thick lines
    #[arg(long)]
    thick2: bool,

    /// Legend name for the input
    #[arg(long)]
    name: Option<String>,

    /// Legend name for the overlay
    #[arg(long)]
    name2: Option<String>,

    /// Leave out the logo
    #[arg(long)]
    nologo: bool,

    /// Write a JSON report
    #[arg(long, value_name = "FILE.json")]
    report: Option<PathBuf>,

    /// Write every analysis point as CSV
    #[arg(long, value_name = "FILE.csv")]
    csv: Option<PathBuf>,
}

impl AnalyzeArgs {
    fn to_config(&self) -> Result<RunConfig> {
        let (inputs, output) = match self.files.as_slice() {
            [inputs @ .., output] if !inputs.is_empty() => (inputs, output),
            _ => bail!("Expected an input image and an output file"),
        };

        let mut scale = ScaleRequest::natural();
        if let Some(sf) = self.sf {
            scale = scale.with_factor(sf);
        }
        if let Some(ff) = self.ff {
            scale = scale.with_fudge(ff);
        }
        scale.validate().context("Bad --sf/--ff value")?;

        let mut primary = InfileInfo::new(&inputs[0]).with_scale(scale).with_thick(self.thick);
        if let Some(name) = &self.name {
            primary = primary.with_name(name);
        }

        let range = RangeExpansion::from_level(self.range).unwrap_or_default();
        let color_space = if self.srgb {
            ColorSpace::Srgb
        } else {
            ColorSpace::Linear
        };

        let mut builder = RunConfig::builder(primary, output)
            .color_space(color_space)
            .rotated(self.rotated)
            .range(range)
            .include_logo(!self.nologo);

        if let Some(path) = inputs.get(1) {
            let mut secondary = InfileInfo::new(path).with_thick(self.thick2);
            if let Some(name) = &self.name2 {
                secondary = secondary.with_name(name);
            }
            builder = builder.secondary(secondary);
        }

        if self.pd {
            builder = builder.pattern(CalibrationPattern::Dots);
        } else if self.pl {
            builder = builder.pattern(CalibrationPattern::Lines);
        }

        Ok(builder.build())
    }
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let config = args.to_config()?;

    let report = rscope::run_to_file(&config)
        .with_context(|| format!("Failed to produce {}", config.output.display()))?;

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        report
            .write_csv(path)
            .with_context(|| format!("Failed to write CSV {}", path.display()))?;
    }

    if !report.succeeded() {
        let failed = report.files.iter().filter(|f| !f.succeeded()).count();
        bail!("{} of {} input(s) could not be analyzed", failed, report.files.len());
    }

    Ok(())
}
