//! Binary edge detection.
//!
//! Every operator produces an [`EdgeMap`] holding 0/1 per pixel so that a
//! prefix sum over it counts edge pixels directly.
use super::grad::{gradient_magnitude, GradientKernel};
use crate::error::{Result, SynthError};
use crate::image::{ImageF32, ImageU8};
use image::GrayImage;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOperator {
    /// Canny with hysteresis on Sobel magnitude (imageproc).
    Canny,
    /// Sobel magnitude with a single-pass double threshold.
    Sobel,
    /// Scharr magnitude with a single-pass double threshold.
    Scharr,
}

/// Edge operator and its low/high intensity thresholds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeOptions {
    pub operator: EdgeOperator,
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            operator: EdgeOperator::Canny,
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

impl EdgeOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.low_threshold.is_finite() && self.high_threshold.is_finite()) {
            return Err(SynthError::InvalidParameter(
                "edge thresholds must be finite".into(),
            ));
        }
        if self.low_threshold > self.high_threshold {
            return Err(SynthError::InvalidParameter(format!(
                "edge low threshold {} exceeds high threshold {}",
                self.low_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

/// Binary edge mask, row-major, one byte (0 or 1) per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl EdgeMap {
    /// Map with every pixel set to `value` (normalized to 0/1).
    pub fn filled(w: usize, h: usize, value: u8) -> Self {
        Self {
            w,
            h,
            data: vec![u8::from(value != 0); w * h],
        }
    }

    /// Build from an arbitrary mask; any non-zero byte counts as an edge.
    pub fn from_mask(w: usize, h: usize, mask: &[u8]) -> Self {
        Self {
            w,
            h,
            data: mask.iter().take(w * h).map(|&v| u8::from(v != 0)).collect(),
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.w + x] = u8::from(on);
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }

    pub fn edge_count(&self) -> usize {
        self.data.iter().map(|&v| v as usize).sum()
    }
}

/// Run the configured operator over the luma of `image`.
pub fn detect_edges(image: &ImageU8<'_>, options: &EdgeOptions) -> Result<EdgeMap> {
    image.check_format()?;
    options.validate()?;
    let (w, h) = (image.w, image.h);
    if w == 0 || h == 0 {
        return Ok(EdgeMap::filled(w, h, 0));
    }
    let map = match options.operator {
        EdgeOperator::Canny => canny(image, options.low_threshold, options.high_threshold),
        EdgeOperator::Sobel => gradient_double_threshold(
            image,
            GradientKernel::Sobel,
            options.low_threshold,
            options.high_threshold,
        ),
        EdgeOperator::Scharr => gradient_double_threshold(
            image,
            GradientKernel::Scharr,
            options.low_threshold,
            options.high_threshold,
        ),
    };
    log::debug!(
        "detect_edges: {:?} {}x{} -> {} edge pixels",
        options.operator,
        w,
        h,
        map.edge_count()
    );
    Ok(map)
}

fn canny(image: &ImageU8<'_>, low: f32, high: f32) -> EdgeMap {
    let gray = GrayImage::from_fn(image.w as u32, image.h as u32, |x, y| {
        image::Luma([image.luma(x as usize, y as usize)])
    });
    let edges = imageproc::edges::canny(&gray, low, high);
    EdgeMap::from_mask(image.w, image.h, edges.as_raw())
}

/// Strong pixels (`mag >= high`) are edges; weak pixels (`mag >= low`) are
/// edges only when one of their 8 neighbours is strong.
fn gradient_double_threshold(
    image: &ImageU8<'_>,
    kernel: GradientKernel,
    low: f32,
    high: f32,
) -> EdgeMap {
    let luma = ImageF32::from_luma(image);
    let mag = gradient_magnitude(&luma, kernel);
    let (w, h) = (luma.w, luma.h);
    let mut out = EdgeMap::filled(w, h, 0);
    for y in 0..h {
        for x in 0..w {
            let m = mag.get(x, y);
            if m >= high {
                out.set(x, y, true);
                continue;
            }
            if m < low {
                continue;
            }
            let y0 = y.saturating_sub(1);
            let y1 = (y + 1).min(h - 1);
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(w - 1);
            let strong_neighbour =
                (y0..=y1).any(|yy| (x0..=x1).any(|xx| mag.get(xx, yy) >= high));
            out.set(x, y, strong_neighbour);
        }
    }
    out
}
