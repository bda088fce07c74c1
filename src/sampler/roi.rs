//! Generic regions of interest shaped by scale and aspect ratio.
use crate::error::{Result, SynthError};
use crate::integral::{score, IntegralImage};
use crate::nms::nms;
use crate::params::{uniform, Parameter};
use crate::types::{ImageSize, RoiBox, ScoredBox};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiOptions {
    pub num_rois: usize,
    /// Box height as a fraction of the image height.
    pub scales: Parameter<f32>,
    /// Width over height.
    pub ratios: Parameter<f32>,
    pub iou_threshold: f32,
    /// Maximum edge pixels; smoother boxes rank higher.
    pub smooth_threshold: f32,
    /// Spacing kept around each box during NMS, in pixels.
    pub border: u32,
}

impl Default for RoiOptions {
    fn default() -> Self {
        Self {
            num_rois: 32,
            scales: Parameter::Range(0.05, 0.3),
            ratios: Parameter::Range(0.5, 4.0),
            iou_threshold: 0.0,
            smooth_threshold: 1.0,
            border: 0,
        }
    }
}

/// Random box of height `H * scale` and width `height * ratio`.
///
/// The origin is uniform over positions where the box fits, clamped to zero;
/// the far edge is clamped to the last pixel. Coordinates are truncated to
/// whole pixels. Only an empty image or an unusable parameter fails.
pub fn sample_roi<R: Rng + ?Sized>(
    image_size: ImageSize,
    scale: &Parameter<f32>,
    ratio: &Parameter<f32>,
    rng: &mut R,
) -> Result<RoiBox> {
    if image_size.width == 0 || image_size.height == 0 {
        return Err(SynthError::InvalidParameter(
            "cannot sample a box in an empty image".into(),
        ));
    }
    let scale = scale.resolve(rng)?;
    let ratio = ratio.resolve(rng)?;

    let (img_w, img_h) = (image_size.width as f32, image_size.height as f32);
    let h = img_h * scale;
    let w = h * ratio;

    let x1 = uniform(rng, 0.0, img_w - w);
    let y1 = uniform(rng, 0.0, img_h - h);
    let x2 = (x1 + w).min(img_w - 1.0);
    let y2 = (y1 + h).min(img_h - 1.0);
    let x1 = x1.max(0.0);
    let y1 = y1.max(0.0);

    Ok(RoiBox::new(x1.trunc(), y1.trunc(), x2.trunc(), y2.trunc()))
}

/// Smooth, well-spaced boxes with their scores and priorities.
///
/// Draws `num_rois` boxes, drops those whose edge count exceeds
/// `smooth_threshold`, ranks the rest by `smooth_threshold - score`, and
/// runs NMS on copies grown by `border`. Survivors come back at their
/// original size, best first.
pub fn sample_multi_roi_scored<R: Rng + ?Sized>(
    integral: &IntegralImage,
    options: &RoiOptions,
    rng: &mut R,
) -> Result<Vec<ScoredBox>> {
    options.scales.validate()?;
    options.ratios.validate()?;
    let size = integral.image_size();
    let border = options.border as f32;

    let mut kept: Vec<ScoredBox> = Vec::with_capacity(options.num_rois);
    for _ in 0..options.num_rois {
        let roi = sample_roi(size, &options.scales, &options.ratios, rng)?;
        let s = score(integral, &roi);
        if s > options.smooth_threshold {
            continue;
        }
        kept.push(ScoredBox::new(roi, s).with_priority(options.smooth_threshold - s));
    }

    let inflated: Vec<RoiBox> = kept.iter().map(|b| b.roi.inflate(border)).collect();
    let priorities: Vec<f32> = kept
        .iter()
        .map(|b| b.priority.unwrap_or_default())
        .collect();
    let keep = nms(&inflated, &priorities, options.iou_threshold);
    debug!(
        "sample_multi_roi: {} draws, {} smooth, {} after nms",
        options.num_rois,
        kept.len(),
        keep.len()
    );

    Ok(keep
        .into_iter()
        .map(|i| ScoredBox {
            roi: inflated[i].deflate(border),
            ..kept[i]
        })
        .collect())
}

/// Box-only view of [`sample_multi_roi_scored`].
pub fn sample_multi_roi<R: Rng + ?Sized>(
    integral: &IntegralImage,
    options: &RoiOptions,
    rng: &mut R,
) -> Result<Vec<RoiBox>> {
    Ok(sample_multi_roi_scored(integral, options, rng)?
        .into_iter()
        .map(|b| b.roi)
        .collect())
}
