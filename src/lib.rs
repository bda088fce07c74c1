//! Synthetic text placement on natural images.
//!
//! Backgrounds are turned into an edge-density integral image; text boxes and
//! generic regions of interest are then sampled where few edges fall, spread
//! apart with non-maximum suppression, colored against their background and
//! drawn. The `synth_gen` binary runs the whole pipeline over a directory of
//! backgrounds.

// Core sampling surface
pub mod error;
pub mod integral;
pub mod nms;
pub mod params;
pub mod sampler;
pub mod types;

// Building blocks and collaborators.
pub mod color;
pub mod edges;
pub mod files;
pub mod image;
pub mod text;

// Batch tooling.
pub mod config;
pub mod diagnostics;
pub mod generator;
pub mod render;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{Result, SynthError};
pub use crate::integral::{build_integral, score, IntegralImage};
pub use crate::nms::nms;
pub use crate::params::Parameter;
pub use crate::sampler::{
    sample_box, sample_many_text_boxes, sample_multi_roi, sample_roi, Placement, RoiOptions,
    TextBoxOptions,
};
pub use crate::types::{ImageSize, RoiBox, ScoredBox};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use synthtext_roi::prelude::*;
/// use rand::SeedableRng;
///
/// # fn main() -> synthtext_roi::Result<()> {
/// let (w, h) = (640usize, 480usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8::packed(w, h, 1, &gray);
///
/// let integral = build_integral(&img, &EdgeOptions::default())?;
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let rois = sample_multi_roi(&integral, &RoiOptions::default(), &mut rng)?;
/// println!("{} smooth regions", rois.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::edges::EdgeOptions;
    pub use crate::image::ImageU8;
    pub use crate::text::{GlyphFont, MeasureText, TextSource};
    pub use crate::{
        build_integral, sample_box, sample_many_text_boxes, sample_multi_roi, sample_roi,
        score, ImageSize, IntegralImage, Parameter, RoiBox, RoiOptions, TextBoxOptions,
    };
}
