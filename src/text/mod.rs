//! Text collaborators: measurement, fonts and corpus sources.

pub mod corpus;
pub mod font;

pub use corpus::{Corpus, CorpusConfig, CyclicCorpus, LineCorpus, TextSource};
pub use font::{load_font, random_font, FontLibrary, GlyphFont};

use crate::types::RoiBox;

/// Rendered extent of a string, relative to the drawing origin.
///
/// The box is the ink, so `x1`/`y1` are usually positive: glyphs sit below
/// the ascent line and after their left bearing.
///
/// Implemented by [`GlyphFont`]; tests plug in fixed-advance fakes.
pub trait MeasureText {
    fn text_bbox(&self, text: &str, size: f32) -> RoiBox;
}
