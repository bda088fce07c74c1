//! Text color heuristics against a background patch.
//!
//! Two strategies:
//! - lightness: HLS lightness of the candidate must stay within `max_diff`
//!   of the mean background lightness (both on a 0..=255 scale);
//! - contrast: the ratio `(Y_bg + 0.05) / (Y_text + 0.05)` with
//!   `Y = 0.299 r + 0.587 g + 0.114 b` on 0..=1 channels must reach
//!   `min_rate`, which favours dark text on light backgrounds.
use crate::image::ImageU8;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub type Rgb8 = [u8; 3];

/// Retry cap of the lightness search.
pub const LIGHTNESS_MAX_LOOP: usize = 1500;
pub const DEFAULT_MAX_DIFF: f32 = 150.0;
pub const DEFAULT_MIN_RATE: f32 = 4.5;
pub const DEFAULT_CONTRAST_MAX_LOOP: usize = 1000;

/// Color strategy; omitted fields take the defaults above.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ColorOptions {
    Lightness {
        #[serde(default = "default_max_diff")]
        max_diff: f32,
    },
    Contrast {
        #[serde(default = "default_min_rate")]
        min_rate: f32,
        #[serde(default = "default_contrast_max_loop")]
        max_loop: usize,
    },
}

impl Default for ColorOptions {
    fn default() -> Self {
        ColorOptions::Contrast {
            min_rate: DEFAULT_MIN_RATE,
            max_loop: DEFAULT_CONTRAST_MAX_LOOP,
        }
    }
}

fn default_max_diff() -> f32 {
    DEFAULT_MAX_DIFF
}

fn default_min_rate() -> f32 {
    DEFAULT_MIN_RATE
}

fn default_contrast_max_loop() -> usize {
    DEFAULT_CONTRAST_MAX_LOOP
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb8 {
    [rng.gen(), rng.gen(), rng.gen()]
}

/// HLS lightness `(max + min) / 2` on the 0..=255 scale.
#[inline]
pub fn hls_lightness(rgb: Rgb8) -> f32 {
    let max = rgb.iter().copied().max().unwrap_or(0) as f32;
    let min = rgb.iter().copied().min().unwrap_or(0) as f32;
    (max + min) * 0.5
}

pub fn mean_lightness(background: &ImageU8<'_>) -> f32 {
    let n = background.w * background.h;
    if n == 0 {
        return 0.0;
    }
    let mut acc = 0f64;
    for y in 0..background.h {
        for x in 0..background.w {
            acc += hls_lightness(background.rgb(x, y)) as f64;
        }
    }
    (acc / n as f64) as f32
}

/// True when the color's lightness is within `max_diff` of the background mean.
pub fn check_suitability(background: &ImageU8<'_>, color: Rgb8, max_diff: f32) -> bool {
    lightness_close(mean_lightness(background), color, max_diff)
}

#[inline]
fn lightness_close(mean: f32, color: Rgb8, max_diff: f32) -> bool {
    (hls_lightness(color) - mean).abs() <= max_diff
}

/// Random color passing [`check_suitability`], or `None` after
/// [`LIGHTNESS_MAX_LOOP`] rejections.
pub fn gen_text_color<R: Rng + ?Sized>(
    background: &ImageU8<'_>,
    max_diff: f32,
    rng: &mut R,
) -> Option<Rgb8> {
    let mean = mean_lightness(background);
    let mut failures = 0usize;
    loop {
        if failures > LIGHTNESS_MAX_LOOP {
            return None;
        }
        let color = random_color(rng);
        if lightness_close(mean, color, max_diff) {
            return Some(color);
        }
        failures += 1;
    }
}

#[inline]
fn weighted_luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Random color whose contrast ratio against the mean background color
/// reaches `min_rate`, or `None` after `max_loop` redraws.
pub fn gen_text_color_contrast<R: Rng + ?Sized>(
    background: &ImageU8<'_>,
    min_rate: f32,
    max_loop: usize,
    rng: &mut R,
) -> Option<Rgb8> {
    let [r, g, b] = background.mean_rgb();
    let bg_lum = weighted_luminance(r / 255.0, g / 255.0, b / 255.0) + 0.05;
    let draw = |rng: &mut R| -> [f32; 3] { [rng.gen(), rng.gen(), rng.gen()] };
    let contrast = |c: &[f32; 3]| bg_lum / (weighted_luminance(c[0], c[1], c[2]) + 0.05);

    let mut candidate = draw(rng);
    let mut count = 0usize;
    while contrast(&candidate) < min_rate {
        count += 1;
        if count > max_loop {
            return None;
        }
        candidate = draw(rng);
    }
    Some([
        (candidate[0] * 255.0) as u8,
        (candidate[1] * 255.0) as u8,
        (candidate[2] * 255.0) as u8,
    ])
}

/// Dispatch on the configured strategy.
pub fn pick_text_color<R: Rng + ?Sized>(
    background: &ImageU8<'_>,
    options: &ColorOptions,
    rng: &mut R,
) -> Option<Rgb8> {
    match *options {
        ColorOptions::Lightness { max_diff } => gen_text_color(background, max_diff, rng),
        ColorOptions::Contrast { min_rate, max_loop } => {
            gen_text_color_contrast(background, min_rate, max_loop, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn solid(rgb: Rgb8, w: usize, h: usize) -> Vec<u8> {
        (0..w * h).flat_map(|_| rgb).collect()
    }

    #[test]
    fn lightness_of_primaries() {
        assert_eq!(hls_lightness([0, 0, 0]), 0.0);
        assert_eq!(hls_lightness([255, 255, 255]), 255.0);
        assert_eq!(hls_lightness([255, 0, 0]), 127.5);
    }

    #[test]
    fn suitability_compares_against_mean_lightness() {
        let data = solid([255, 255, 255], 8, 8);
        let bg = ImageU8::packed(8, 8, 3, &data);
        assert!(check_suitability(&bg, [200, 200, 200], 150.0));
        assert!(!check_suitability(&bg, [0, 0, 0], 150.0));
    }

    #[test]
    fn lightness_search_respects_threshold() {
        let mut rng = StdRng::seed_from_u64(9);
        let data = solid([20, 20, 20], 6, 6);
        let bg = ImageU8::packed(6, 6, 3, &data);
        for _ in 0..20 {
            let c = gen_text_color(&bg, 60.0, &mut rng).unwrap();
            assert!((hls_lightness(c) - 20.0).abs() <= 60.0);
        }
    }

    #[test]
    fn impossible_lightness_gives_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = solid([128, 128, 128], 4, 4);
        let bg = ImageU8::packed(4, 4, 3, &data);
        assert_eq!(gen_text_color(&bg, -1.0, &mut rng), None);
    }

    #[test]
    fn contrast_on_white_yields_dark_text() {
        let mut rng = StdRng::seed_from_u64(2);
        let data = solid([255, 255, 255], 5, 5);
        let bg = ImageU8::packed(5, 5, 3, &data);
        let c = gen_text_color_contrast(&bg, 4.5, 1000, &mut rng).unwrap();
        let lum = weighted_luminance(c[0] as f32, c[1] as f32, c[2] as f32) / 255.0;
        assert!((1.05 / (lum + 0.05)) >= 4.4, "color {c:?} too light");
    }

    #[test]
    fn contrast_on_black_is_unreachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = vec![0u8; 5 * 5];
        let bg = ImageU8::packed(5, 5, 1, &data);
        assert_eq!(gen_text_color_contrast(&bg, 4.5, 50, &mut rng), None);
    }

    #[test]
    fn options_parse_from_json() {
        let o: ColorOptions =
            serde_json::from_str(r#"{"method": "lightness", "max_diff": 120.0}"#).unwrap();
        assert_eq!(o, ColorOptions::Lightness { max_diff: 120.0 });
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let o: ColorOptions = serde_json::from_str(r#"{"method": "lightness"}"#).unwrap();
        assert_eq!(o, ColorOptions::Lightness { max_diff: 150.0 });
        let o: ColorOptions =
            serde_json::from_str(r#"{"method": "contrast", "max_loop": 20}"#).unwrap();
        assert_eq!(
            o,
            ColorOptions::Contrast {
                min_rate: 4.5,
                max_loop: 20
            }
        );
    }
}
