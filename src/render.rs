//! Drawing placements onto backgrounds and describing them as labels.
use crate::color::Rgb8;
use crate::image::ImageU8;
use crate::sampler::Placement;
use crate::text::{GlyphFont, MeasureText};
use ab_glyph::PxScale;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use serde::{Deserialize, Serialize};

/// Placement with the color it will be drawn in.
#[derive(Clone, Debug)]
pub struct StyledPlacement<F> {
    pub placement: Placement<F>,
    pub color: Rgb8,
}

/// One text instance in a label file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    pub text: String,
    /// `[x1, y1, x2, y2]` in pixels.
    #[serde(rename = "box")]
    pub bbox: [f32; 4],
    pub font_size: u32,
    pub font: String,
    pub color: Rgb8,
}

impl LabelBox {
    pub fn new<F>(styled: &StyledPlacement<F>, font: impl Into<String>) -> Self {
        let p = &styled.placement;
        Self {
            text: p.text.clone(),
            bbox: p.roi.as_array(),
            font_size: p.font_size,
            font: font.into(),
            color: styled.color,
        }
    }
}

/// Label file written next to each rendered sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleLabel {
    pub image: String,
    pub width: usize,
    pub height: usize,
    pub boxes: Vec<LabelBox>,
}

impl SampleLabel {
    pub fn new(
        image: impl Into<String>,
        width: usize,
        height: usize,
        styled: &[StyledPlacement<GlyphFont>],
    ) -> Self {
        Self {
            image: image.into(),
            width,
            height,
            boxes: styled
                .iter()
                .map(|s| LabelBox::new(s, s.placement.font.name()))
                .collect(),
        }
    }
}

/// RGB copy of a background view.
pub fn rgb_canvas(background: &ImageU8<'_>) -> RgbImage {
    RgbImage::from_fn(background.w as u32, background.h as u32, |x, y| {
        Rgb(background.rgb(x as usize, y as usize))
    })
}

/// Draw every placement's text so that its ink starts at the box corner.
///
/// The drawing origin sits above and left of the ink by the measured
/// extent's offset; ink covers columns `floor(x1)..floor(x1) + width` and
/// the matching rows.
pub fn draw_placements(canvas: &mut RgbImage, styled: &[StyledPlacement<GlyphFont>]) {
    for s in styled {
        let p = &s.placement;
        let size = p.font_size as f32;
        let extent = p.font.text_bbox(&p.text, size);
        draw_text_mut(
            canvas,
            Rgb(s.color),
            (p.roi.x1 - extent.x1).floor() as i32,
            (p.roi.y1 - extent.y1).floor() as i32,
            PxScale::from(size),
            p.font.face(),
            &p.text,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoiBox;

    #[test]
    fn label_box_serializes_box_key() {
        let styled = StyledPlacement {
            placement: Placement {
                roi: RoiBox::new(1.0, 2.0, 30.0, 14.0),
                text: "hi there".into(),
                font_size: 12,
                font: (),
                score: 0.0,
            },
            color: [10, 20, 30],
        };
        let label = LabelBox::new(&styled, "Sans.ttf");
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["box"], serde_json::json!([1.0, 2.0, 30.0, 14.0]));
        assert_eq!(json["font"], "Sans.ttf");
        assert_eq!(json["color"], serde_json::json!([10, 20, 30]));
    }

    #[test]
    fn canvas_replicates_gray() {
        let data = vec![42u8; 6];
        let view = ImageU8::packed(3, 2, 1, &data);
        let canvas = rgb_canvas(&view);
        assert_eq!(canvas.dimensions(), (3, 2));
        assert_eq!(canvas.get_pixel(2, 1), &Rgb([42, 42, 42]));
    }
}
