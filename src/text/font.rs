//! TrueType/OpenType fonts backed by `ab_glyph`.
//!
//! Measurement follows the glyph layout `imageproc` draws with.
use super::MeasureText;
use crate::error::{Result, SynthError};
use crate::files::find_fonts;
use crate::params::Parameter;
use crate::types::RoiBox;
use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed font plus a nominal pixel size. Cloning shares the glyph data.
#[derive(Clone)]
pub struct GlyphFont {
    path: PathBuf,
    font: Arc<FontVec>,
    size: f32,
}

impl GlyphFont {
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>, size: f32) -> Result<Self> {
        let path = path.into();
        let font = FontVec::try_from_vec(data).map_err(|e| SynthError::Font {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path,
            font: Arc::new(font),
            size,
        })
    }

    /// Same face at another pixel size.
    pub fn variant(&self, size: f32) -> Self {
        Self {
            path: self.path.clone(),
            font: Arc::clone(&self.font),
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in labels.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn scale(&self) -> PxScale {
        PxScale::from(self.size)
    }

    pub fn face(&self) -> &FontVec {
        &self.font
    }
}

impl fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphFont")
            .field("path", &self.path)
            .field("size", &self.size)
            .finish()
    }
}

impl MeasureText for GlyphFont {
    /// Union of the glyph pixel bounds, laid out the way
    /// `imageproc::drawing::draw_text_mut` places them: each glyph at
    /// `(caret, ascent)`, the caret advancing by `h_advance` and kerning
    /// applied after each outlined glyph. Strings without ink measure as
    /// zero height at their advance width.
    fn text_bbox(&self, text: &str, size: f32) -> RoiBox {
        let scale = PxScale::from(size);
        let scaled = self.face().as_scaled(scale);
        let ascent = scaled.ascent();
        let mut caret = 0f32;
        let mut last: Option<GlyphId> = None;
        let mut ink: Option<RoiBox> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            let glyph = id.with_scale_and_position(scale, point(caret, ascent));
            caret += scaled.h_advance(id);
            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            if let Some(prev) = last {
                caret += scaled.kern(id, prev);
            }
            last = Some(id);
            let b = outlined.px_bounds();
            let (x1, y1) = (b.min.x.round(), b.min.y.round());
            let (x2, y2) = (x1 + b.width(), y1 + b.height());
            ink = Some(match ink {
                Some(r) => RoiBox::new(r.x1.min(x1), r.y1.min(y1), r.x2.max(x2), r.y2.max(y2)),
                None => RoiBox::new(x1, y1, x2, y2),
            });
        }
        ink.unwrap_or_else(|| RoiBox::new(0.0, 0.0, caret.max(0.0), 0.0))
    }
}

/// Read and parse a font file at the given nominal size.
pub fn load_font(path: &Path, size: f32) -> Result<GlyphFont> {
    let data = std::fs::read(path).map_err(|e| SynthError::io(path, e))?;
    GlyphFont::from_bytes(path, data, size)
}

/// Load one of `paths` at a size drawn from `sizes`.
pub fn random_font<R: Rng + ?Sized>(
    paths: &[PathBuf],
    sizes: &Parameter<f32>,
    rng: &mut R,
) -> Result<GlyphFont> {
    let path = paths.choose(rng).ok_or(SynthError::NoFonts)?;
    let size = sizes.resolve(rng)?;
    load_font(path, size)
}

/// Set of fonts a generator draws from.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    fonts: Vec<GlyphFont>,
}

impl FontLibrary {
    pub fn new(fonts: Vec<GlyphFont>) -> Self {
        Self { fonts }
    }

    /// Load every `.ttf`/`.otf` under `dir`. Unparseable files are skipped
    /// with a warning; an empty result is an error.
    pub fn load_dir(dir: &Path, size: f32) -> Result<Self> {
        let mut fonts = Vec::new();
        for path in find_fonts(dir)? {
            match load_font(&path, size) {
                Ok(font) => fonts.push(font),
                Err(err) => log::warn!("skipping font {}: {err}", path.display()),
            }
        }
        if fonts.is_empty() {
            return Err(SynthError::NoFonts);
        }
        log::debug!("FontLibrary::load_dir {} -> {} fonts", dir.display(), fonts.len());
        Ok(Self { fonts })
    }

    pub fn fonts(&self) -> &[GlyphFont] {
        &self.fonts
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&GlyphFont> {
        self.fonts.choose(rng).ok_or(SynthError::NoFonts)
    }
}
