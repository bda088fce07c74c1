//! Borrowed 8-bit image view with interleaved channels.

use crate::error::{Result, SynthError};

/// Read-only view over interleaved 8-bit samples.
///
/// `stride` counts bytes between consecutive rows, so a view can describe a
/// crop of a larger buffer without copying.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    /// Samples per pixel (1 = gray, 3 = RGB, 4 = RGBA).
    pub channels: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view over `data`.
    pub fn packed(w: usize, h: usize, channels: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            channels,
            stride: w * channels,
            data,
        }
    }

    /// Fail unless the channel layout is gray, RGB or RGBA.
    pub fn check_format(&self) -> Result<()> {
        match self.channels {
            1 | 3 | 4 => Ok(()),
            channels => Err(SynthError::UnsupportedFormat { channels }),
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = y * self.stride + x * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Rec. 601 luma of a pixel; alpha is ignored.
    #[inline]
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        let p = self.pixel(x, y);
        match p.len() {
            1 | 2 => p[0],
            _ => rgb_to_luma(p[0], p[1], p[2]),
        }
    }

    /// Mean RGB over the view. Gray pixels contribute their value to all three.
    pub fn mean_rgb(&self) -> [f32; 3] {
        let n = (self.w * self.h) as f64;
        if n == 0.0 {
            return [0.0; 3];
        }
        let mut acc = [0f64; 3];
        for y in 0..self.h {
            for x in 0..self.w {
                let [r, g, b] = self.rgb(x, y);
                acc[0] += r as f64;
                acc[1] += g as f64;
                acc[2] += b as f64;
            }
        }
        [
            (acc[0] / n) as f32,
            (acc[1] / n) as f32,
            (acc[2] / n) as f32,
        ]
    }

    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let p = self.pixel(x, y);
        if p.len() >= 3 {
            [p[0], p[1], p[2]]
        } else {
            [p[0], p[0], p[0]]
        }
    }

    /// Sub-view covering `[x, x + w) x [y, y + h)`, clipped to the image.
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> ImageU8<'a> {
        let x = x.min(self.w);
        let y = y.min(self.h);
        let w = w.min(self.w - x);
        let h = h.min(self.h - y);
        let offset = if w == 0 || h == 0 {
            0
        } else {
            y * self.stride + x * self.channels
        };
        ImageU8 {
            w,
            h,
            channels: self.channels,
            stride: self.stride,
            data: &self.data[offset..],
        }
    }
}

#[inline]
pub fn rgb_to_luma(r: u8, g: u8, b: u8) -> u8 {
    let l = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    l.round().clamp(0.0, 255.0) as u8
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * self.channels]
    }
}
