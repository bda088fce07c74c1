//! I/O helpers for background images, rendered samples and JSON.
//!
//! - `load_image`: decode any format the `image` crate knows into an owned
//!   8-bit buffer, keeping the channel layout of the source.
//! - `save_rgb_image`: write a rendered sample, picking the codec by extension.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ImageU8;
use crate::error::{Result, SynthError};
use image::{DynamicImage, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit interleaved buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct OwnedImageU8 {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl OwnedImageU8 {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8::packed(self.width, self.height, self.channels, &self.data)
    }

    /// Flatten to RGB; alpha is dropped and gray is replicated.
    pub fn to_rgb_image(&self) -> RgbImage {
        let view = self.as_view();
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Rgb(view.rgb(x as usize, y as usize))
        })
    }
}

impl From<DynamicImage> for OwnedImageU8 {
    fn from(img: DynamicImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        let channels = img.color().channel_count() as usize;
        let data = match channels {
            1 => img.into_luma8().into_raw(),
            2 => img.into_luma_alpha8().into_raw(),
            3 => img.into_rgb8().into_raw(),
            _ => img.into_rgba8().into_raw(),
        };
        let channels = channels.min(4);
        Self::new(width, height, channels, data)
    }
}

/// Load an image from disk as 8-bit samples with the source channel count.
pub fn load_image(path: &Path) -> Result<OwnedImageU8> {
    let img = image::open(path).map_err(|source| SynthError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(OwnedImageU8::from(img))
}

/// Save an RGB image, creating parent directories.
pub fn save_rgb_image(image: &RgbImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    image.save(path).map_err(|source| SynthError::ImageEncode {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| SynthError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SynthError::io(parent, e))?;
        }
    }
    Ok(())
}
