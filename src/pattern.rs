//! Calibration patterns.
//!
//! Two synthetic source images are fed to the resizer under test:
//!
//! - **Dot pattern** (`pd.png`, 557x275): 25 horizontal strips of 11 rows.
//!   The middle row of each strip carries isolated light pixels every 25
//!   columns, shifted one column per strip, so that after resizing the strips
//!   together sample the filter at 25 different phases.
//! - **Line pattern** (`pl.png`, 15x15): a single light column in the middle.
//!
//! The geometry constants here are what the estimators assume; a resized
//! image is only meaningful if it came from exactly these sources.

use std::fmt::Write as _;
use std::path::Path;

use imgref::ImgVec;
use rgb::RGB8;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Result;

/// Width of the dot-pattern source. Prime, two more than an easily typed number.
pub const DOT_SRC_WIDTH: usize = 557;
/// Horizontal spacing of reference dots within a strip.
pub const DOT_SPAN: usize = 25;
/// Number of strips, one per phase.
pub const DOT_NUM_STRIPS: usize = DOT_SPAN;
/// Column offset of the first dot in strip 0.
pub const DOT_HCENTER: usize = (DOT_SPAN - 1) / 2;
/// Rows per strip.
pub const DOT_STRIP_HEIGHT: usize = 11;
/// Row within a strip holding the dots.
pub const DOT_VCENTER: usize = (DOT_STRIP_HEIGHT - 1) / 2;
/// Height of the dot-pattern source, which resized images must keep.
pub const DOT_SRC_HEIGHT: usize = DOT_NUM_STRIPS * DOT_STRIP_HEIGHT;
/// Suggested target width for a downscale test.
pub const DOT_DST_WIDTH: usize = DOT_SRC_WIDTH - 2;
/// Narrowest dot-pattern image the estimator accepts.
pub const DOT_MIN_WIDTH: usize = 50;

/// Width of the line-pattern source.
pub const LINE_SRC_WIDTH: usize = 15;
/// Height of the line-pattern source.
pub const LINE_SRC_HEIGHT: usize = 15;
/// Column of the light reference line.
pub const LINE_CENTER: usize = LINE_SRC_WIDTH / 2;
/// Suggested target width for an upscale test. An odd multiple of the source width.
pub const LINE_DST_WIDTH: usize = 555;
/// Shortest line-pattern image the extractor accepts.
pub const LINE_MIN_HEIGHT: usize = 3;

const DARK: RGB8 = RGB8::new(50, 50, 50);
const LIGHT: RGB8 = RGB8::new(250, 250, 250);

/// Which calibration source a resized image was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationPattern {
    /// Isolated dots; measures scale and phase, best for downscaling.
    Dots,
    /// Single line; measures the kernel profile, best for upscaling.
    Lines,
}

impl CalibrationPattern {
    /// Width of the unscaled source image.
    #[must_use]
    pub fn source_width(self) -> usize {
        match self {
            Self::Dots => DOT_SRC_WIDTH,
            Self::Lines => LINE_SRC_WIDTH,
        }
    }

    /// Human-readable name used in log lines.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Dots => "dot pattern",
            Self::Lines => "line pattern",
        }
    }

    /// Border colour of graphs made from this pattern.
    #[must_use]
    pub fn border_color(self) -> RGB8 {
        match self {
            Self::Dots => RGB8::new(144, 192, 144),
            Self::Lines => RGB8::new(204, 136, 204),
        }
    }
}

/// Whether source pixel `(x, y)` of the dot pattern is a reference dot.
#[must_use]
pub fn is_dot(x: usize, y: usize) -> bool {
    y % DOT_STRIP_HEIGHT == DOT_VCENTER
        && (DOT_HCENTER..DOT_SRC_WIDTH - DOT_HCENTER).contains(&x)
        && (x + DOT_SPAN - (y / DOT_STRIP_HEIGHT)) % DOT_SPAN == DOT_HCENTER
}

/// Generate the 557x275 dot pattern.
#[must_use]
pub fn generate_dot_pattern() -> ImgVec<RGB8> {
    let pixels = (0..DOT_SRC_HEIGHT)
        .flat_map(|y| (0..DOT_SRC_WIDTH).map(move |x| if is_dot(x, y) { LIGHT } else { DARK }))
        .collect();
    ImgVec::new(pixels, DOT_SRC_WIDTH, DOT_SRC_HEIGHT)
}

/// Generate the 15x15 line pattern.
#[must_use]
pub fn generate_line_pattern() -> ImgVec<RGB8> {
    let pixels = (0..LINE_SRC_HEIGHT)
        .flat_map(|_| (0..LINE_SRC_WIDTH).map(|x| if x == LINE_CENTER { LIGHT } else { DARK }))
        .collect();
    ImgVec::new(pixels, LINE_SRC_WIDTH, LINE_SRC_HEIGHT)
}

/// Browser test page showing both patterns at their suggested target sizes.
#[must_use]
pub fn generate_preview_html() -> String {
    let mut html = String::with_capacity(1024);
    html.push_str("<html>\n<head>\n<title>ResampleScope browser test page</title>\n");
    html.push_str("<style>\nIMG { -ms-interpolation-mode:bicubic }\nTD.t { text-align:right }\n</style>\n");
    html.push_str("</head>\n<body bgcolor=\"#bbbbcc\">\n<table>\n");
    let _ = writeln!(
        html,
        "<tr><td class=t>Upscale:</td><td colspan=2><img src=pl.png width={} height={}></td></tr>",
        LINE_DST_WIDTH, LINE_SRC_HEIGHT
    );
    let _ = writeln!(
        html,
        "<tr><td class=t>Downscale:</td><td colspan=2><img src=pd.png width={} height={}></td></tr>",
        DOT_DST_WIDTH, DOT_SRC_HEIGHT
    );
    let _ = writeln!(
        html,
        "<tr><td class=t>Downscale350,200:</td><td><img src=pd.png width=350 height={}></td>",
        DOT_SRC_HEIGHT
    );
    let _ = writeln!(html, "<td><img src=pd.png width=200 height={}></td></tr>", DOT_SRC_HEIGHT);
    html.push_str("</table>\n</body>\n</html>\n");
    html
}

/// Write `pl.png`, `pd.png` and `rscope.html` into `dir`.
pub fn write_calibration_set(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let line_path = dir.join("pl.png");
    codec::encode(generate_line_pattern().as_ref(), &line_path)?;
    log::info!(
        "Wrote {} ({}x{} - resize to {}x{})",
        line_path.display(),
        LINE_SRC_WIDTH,
        LINE_SRC_HEIGHT,
        LINE_DST_WIDTH,
        LINE_SRC_HEIGHT
    );

    let dot_path = dir.join("pd.png");
    codec::encode(generate_dot_pattern().as_ref(), &dot_path)?;
    log::info!(
        "Wrote {} ({}x{} - resize to {}x{})",
        dot_path.display(),
        DOT_SRC_WIDTH,
        DOT_SRC_HEIGHT,
        DOT_DST_WIDTH,
        DOT_SRC_HEIGHT
    );

    let html_path = dir.join("rscope.html");
    std::fs::write(&html_path, generate_preview_html())?;
    log::info!("Wrote {}", html_path.display());

    Ok(())
}
