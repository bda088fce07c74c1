use rand::Rng;
use synthtext_roi::text::{MeasureText, TextSource};
use synthtext_roi::{Result, RoiBox};

/// Monospace stand-in: every char advances `0.5 * size`, height == size.
#[derive(Clone, Debug)]
pub struct Mono;

impl MeasureText for Mono {
    fn text_bbox(&self, text: &str, size: f32) -> RoiBox {
        RoiBox::new(0.0, 0.0, 0.5 * size * text.chars().count() as f32, size)
    }
}

/// Text source repeating one string.
pub struct Repeat(pub &'static str);

impl TextSource for Repeat {
    fn next_text<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Pairwise IoU of every pair in `boxes`.
pub fn pairwise_iou(boxes: &[RoiBox]) -> Vec<f32> {
    let mut out = Vec::new();
    for (i, a) in boxes.iter().enumerate() {
        for b in &boxes[i + 1..] {
            out.push(a.iou(b));
        }
    }
    out
}
