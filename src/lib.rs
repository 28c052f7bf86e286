//! # rscope
//!
//! Measures the filter an image resizer uses.
//!
//! Resize one of two synthetic calibration images with the program under
//! test, then hand the result to this library. It reconstructs the
//! resampling kernel from the resized pixels and draws it on a graph.
//!
//! - The **dot pattern** (557x275) has isolated light dots on a dark field.
//!   Resizing its width to anything else shows the kernel as a scatter plot.
//! - The **line pattern** (15x15) has one light vertical line. Enlarging its
//!   width to 555 shows the kernel as a continuous profile.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rscope::{InfileInfo, RunConfig};
//!
//! rscope::pattern::write_calibration_set("./patterns".as_ref())?;
//! // ... resize ./patterns/pd.png to 555x275 with the program under test ...
//!
//! let config = RunConfig::builder(InfileInfo::new("pd555.png"), "graph.png").build();
//! let report = rscope::run_to_file(&config)?;
//! assert!(report.succeeded());
//! ```
//!
//! ## Modules
//!
//! - [`pattern`]: calibration pattern geometry and generation
//! - [`codec`]: reading and writing raster images
//! - [`color`]: sRGB correction of sampled intensities
//! - [`sampler`]: calibrated, optionally transposed pixel access
//! - [`selector`]: opening the first input and detecting its pattern
//! - [`analysis`]: scale factor resolution and shared analysis state
//! - [`dots`]: kernel estimation from the dot pattern
//! - [`lines`]: kernel profile extraction from the line pattern
//! - [`canvas`]: raster and SVG drawing surfaces
//! - [`graph`]: coordinate mapping and graph decorations
//! - [`scope`]: run orchestration
//! - [`report`]: JSON and CSV reports

pub mod analysis;
pub mod canvas;
pub mod codec;
pub mod color;
pub mod dots;
pub mod error;
pub mod graph;
pub mod lines;
pub mod pattern;
pub mod report;
pub mod sampler;
pub mod scope;
pub mod selector;

// Re-export commonly used types
pub use analysis::{AnalysisState, DataPoint, ScaleRequest};
pub use canvas::{Canvas, RasterCanvas};
#[cfg(feature = "svg")]
pub use canvas::SvgCanvas;
pub use color::ColorSpace;
pub use error::{DimensionError, Error, Result};
pub use graph::{GraphMapper, RangeExpansion};
pub use pattern::CalibrationPattern;
pub use report::{FileReport, InputRole, RunReport};
pub use scope::{InfileInfo, RunConfig, RunConfigBuilder, run, run_to_file};
pub use selector::{OpenCalibrationSource, Selection, select};
