//! Text-box placement: bounded rejection sampling per box, then NMS.
use crate::error::{Result, SynthError};
use crate::integral::{score, IntegralImage};
use crate::nms::nms;
use crate::params::uniform;
use crate::text::{MeasureText, TextSource};
use crate::types::{ImageSize, RoiBox};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Geometry retries between two warnings about a box that never fits.
const GEOMETRY_WARN_EVERY: usize = 100_000;

/// Constraints shared by every text box drawn for one image.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBoxOptions {
    /// Accepted text height as fractions of the image height.
    pub scale_range: (f32, f32),
    /// Inclusive font size range in pixels.
    pub font_size_range: (u32, u32),
    /// Maximum edge pixels a box may cover.
    pub max_integral: f32,
    /// Cap for each of the two rejection counters.
    pub max_loop: usize,
}

impl Default for TextBoxOptions {
    fn default() -> Self {
        Self {
            scale_range: (0.05, 0.5),
            font_size_range: (10, 100),
            max_integral: 20.0,
            max_loop: 1000,
        }
    }
}

impl TextBoxOptions {
    fn font_sizes(&self) -> (u32, u32) {
        let (a, b) = self.font_size_range;
        (a.min(b), a.max(b))
    }
}

/// Accepted box for a single string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TextBoxSample {
    pub roi: RoiBox,
    pub font_size: u32,
    /// Edge pixels covered by `roi`.
    pub score: f32,
}

/// Final placement with its payload.
#[derive(Clone, Debug)]
pub struct Placement<F> {
    pub roi: RoiBox,
    pub text: String,
    pub font_size: u32,
    pub font: F,
    pub score: f32,
}

/// Find a box for `text` rendered with `font`, first fit.
///
/// Each iteration draws a font size, measures the text, and drops the box at
/// a uniform origin so that it fits. Height misses and density misses are
/// counted separately; once either count exceeds `max_loop` the search gives
/// up with `None`.
///
/// Draws that put a coordinate below zero (text wider or taller than the
/// image) are retried without counting against either cap. If every font size
/// in range overflows the image this loops forever; a warning is logged every
/// `GEOMETRY_WARN_EVERY` such retries.
pub fn sample_box<F, R>(
    image_size: ImageSize,
    integral: &IntegralImage,
    text: &str,
    font: &F,
    options: &TextBoxOptions,
    rng: &mut R,
) -> Option<TextBoxSample>
where
    F: MeasureText + ?Sized,
    R: Rng + ?Sized,
{
    if image_size.width == 0 || image_size.height == 0 {
        return None;
    }
    let w = image_size.width as f32;
    let h = image_size.height as f32;
    let h_min = h * options.scale_range.0;
    let h_max = h * options.scale_range.1;
    let (size_lo, size_hi) = options.font_sizes();

    let mut height_failures = 0usize;
    let mut density_failures = 0usize;
    let mut geometry_retries = 0usize;
    loop {
        if height_failures > options.max_loop || density_failures > options.max_loop {
            debug!(
                "sample_box: giving up on {:?} (height misses {}, density misses {})",
                text, height_failures, density_failures
            );
            return None;
        }

        let font_size = rng.gen_range(size_lo..=size_hi);
        let extent = font.text_bbox(text, font_size as f32);
        let (text_w, text_h) = (extent.width(), extent.height());

        let x1 = uniform(rng, 0.0, w - text_w);
        let y1 = uniform(rng, 0.0, h - text_h);
        let roi = RoiBox::new(x1, y1, (x1 + text_w).min(w - 1.0), (y1 + text_h).min(h - 1.0));
        if roi.has_negative() || !roi.is_ordered() {
            geometry_retries += 1;
            if geometry_retries % GEOMETRY_WARN_EVERY == 0 {
                warn!(
                    "sample_box: {} draws of {:?} did not fit a {}x{} image",
                    geometry_retries, text, image_size.width, image_size.height
                );
            }
            continue;
        }

        if text_h < h_min || text_h > h_max {
            height_failures += 1;
            continue;
        }

        let density = score(integral, &roi);
        if density > options.max_integral {
            density_failures += 1;
            continue;
        }

        return Some(TextBoxSample {
            roi,
            font_size,
            score: density,
        });
    }
}

/// Draw `n` text boxes and keep a mutually non-overlapping subset.
///
/// Every draw pulls a fresh string from `texts` and a random font from
/// `fonts`; draws that find no box are dropped. Survivors get random
/// priorities and go through NMS with an IoU threshold of zero. The result
/// may be empty.
pub fn sample_many_text_boxes<F, T, R>(
    image_size: ImageSize,
    integral: &IntegralImage,
    n: usize,
    fonts: &[F],
    texts: &mut T,
    options: &TextBoxOptions,
    rng: &mut R,
) -> Result<Vec<Placement<F>>>
where
    F: MeasureText + Clone,
    T: TextSource,
    R: Rng + ?Sized,
{
    let mut candidates: Vec<Placement<F>> = Vec::with_capacity(n);
    for _ in 0..n {
        let text = texts.next_text(rng)?;
        let font = fonts.choose(rng).ok_or(SynthError::NoFonts)?;
        if let Some(sample) = sample_box(image_size, integral, &text, font, options, rng) {
            candidates.push(Placement {
                roi: sample.roi,
                text,
                font_size: sample.font_size,
                font: font.clone(),
                score: sample.score,
            });
        }
    }
    if candidates.is_empty() {
        debug!("sample_many_text_boxes: no box placed out of {n} draws");
        return Ok(Vec::new());
    }

    let boxes: Vec<RoiBox> = candidates.iter().map(|p| p.roi).collect();
    let priorities: Vec<f32> = (0..boxes.len()).map(|_| rng.gen::<f32>()).collect();
    let keep = nms(&boxes, &priorities, 0.0);
    debug!(
        "sample_many_text_boxes: {} draws, {} placed, {} after nms",
        n,
        candidates.len(),
        keep.len()
    );

    let mut slots: Vec<Option<Placement<F>>> = candidates.into_iter().map(Some).collect();
    Ok(keep.into_iter().filter_map(|i| slots[i].take()).collect())
}
