//! Edge-density integral image and O(1) rectangle scores.
//!
//! The integral has one extra row and column: cell `(y, x)` holds the number
//! of edge pixels in `[0, y) x [0, x)`. A box score is then four lookups:
//!
//! ```text
//! score = I(y2, x2) - I(y2, x1) - I(y1, x2) + I(y1, x1)
//! ```
//!
//! Sums are kept in `f32`, exact for counts below 2^24 edge pixels.
use crate::edges::{detect_edges, EdgeMap, EdgeOptions};
use crate::error::Result;
use crate::image::{ImageF32, ImageU8};
use crate::types::{ImageSize, RoiBox};

/// Prefix sums over a binary edge map, `(H + 1) x (W + 1)` cells.
#[derive(Clone, Debug)]
pub struct IntegralImage {
    sums: ImageF32,
}

impl IntegralImage {
    /// Accumulate an edge map.
    pub fn from_edge_map(edges: &EdgeMap) -> Self {
        let (w, h) = (edges.w, edges.h);
        let mut sums = ImageF32::new(w + 1, h + 1);
        for y in 0..h {
            let src = edges.row(y);
            let mut run = 0.0f32;
            for (x, &edge) in src.iter().enumerate() {
                run += edge as f32;
                let above = sums.get(x + 1, y);
                sums.set(x + 1, y + 1, above + run);
            }
        }
        Self { sums }
    }

    /// Size of the image the integral was built from.
    pub fn image_size(&self) -> ImageSize {
        ImageSize::new(self.sums.w - 1, self.sums.h - 1)
    }

    /// Raw lookup `I(y, x)`; indices are clamped into the grid.
    #[inline]
    pub fn at(&self, y: usize, x: usize) -> f32 {
        let x = x.min(self.sums.w - 1);
        let y = y.min(self.sums.h - 1);
        self.sums.get(x, y)
    }

    /// Total edge pixels in the image.
    pub fn total(&self) -> f32 {
        self.at(self.sums.h - 1, self.sums.w - 1)
    }

    /// Edge pixels inside `roi` (see [`score`]).
    pub fn score(&self, roi: &RoiBox) -> f32 {
        score(self, roi)
    }
}

/// Detect edges on `image` and accumulate them.
///
/// Fails with `UnsupportedFormat` unless the image has 1, 3 or 4 channels.
pub fn build_integral(image: &ImageU8<'_>, options: &EdgeOptions) -> Result<IntegralImage> {
    let edges = detect_edges(image, options)?;
    Ok(IntegralImage::from_edge_map(&edges))
}

/// Inclusion-exclusion sum of the edge map over `roi`.
///
/// Coordinates are truncated toward zero and clamped to the grid, so a box
/// hanging off the image scores only its visible part.
#[inline]
pub fn score(integral: &IntegralImage, roi: &RoiBox) -> f32 {
    let size = integral.image_size();
    let gx = |v: f32| grid_index(v, size.width);
    let gy = |v: f32| grid_index(v, size.height);
    let (x1, y1, x2, y2) = (gx(roi.x1), gy(roi.y1), gx(roi.x2), gy(roi.y2));
    integral.at(y2, x2) - integral.at(y2, x1) - integral.at(y1, x2) + integral.at(y1, x1)
}

#[inline]
fn grid_index(v: f32, max: usize) -> usize {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        // `as` saturates, so +inf lands on `max` as well.
        (v as usize).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_map(w: usize, h: usize) -> EdgeMap {
        let mut map = EdgeMap::filled(w, h, 0);
        for y in 0..h {
            for x in 0..w {
                map.set(x, y, (x + y) % 2 == 0);
            }
        }
        map
    }

    fn brute_force(map: &EdgeMap, x1: usize, y1: usize, x2: usize, y2: usize) -> f32 {
        let mut acc = 0.0;
        for y in y1..y2 {
            for x in x1..x2 {
                acc += map.get(x, y) as f32;
            }
        }
        acc
    }

    #[test]
    fn zero_map_scores_zero_everywhere() {
        let integral = IntegralImage::from_edge_map(&EdgeMap::filled(40, 30, 0));
        for roi in [
            RoiBox::new(0.0, 0.0, 39.0, 29.0),
            RoiBox::new(3.5, 7.2, 12.9, 28.0),
            RoiBox::new(10.0, 10.0, 10.0, 10.0),
        ] {
            assert_eq!(score(&integral, &roi), 0.0);
        }
    }

    #[test]
    fn full_map_scores_box_area() {
        let integral = IntegralImage::from_edge_map(&EdgeMap::filled(50, 40, 1));
        let roi = RoiBox::new(5.0, 8.0, 25.0, 30.0);
        assert_eq!(score(&integral, &roi), 20.0 * 22.0);
        assert_eq!(integral.total(), 2000.0);
    }

    #[test]
    fn matches_brute_force_on_checkerboard() {
        let map = checker_map(17, 13);
        let integral = IntegralImage::from_edge_map(&map);
        for &(x1, y1, x2, y2) in &[(0, 0, 17, 13), (1, 2, 9, 11), (4, 4, 5, 5), (16, 0, 17, 13)] {
            let roi = RoiBox::new(x1 as f32, y1 as f32, x2 as f32, y2 as f32);
            assert_eq!(score(&integral, &roi), brute_force(&map, x1, y1, x2, y2));
        }
    }

    #[test]
    fn integral_is_monotone() {
        let integral = IntegralImage::from_edge_map(&checker_map(9, 7));
        for y in 0..=7 {
            for x in 0..=9 {
                if x > 0 {
                    assert!(integral.at(y, x) >= integral.at(y, x - 1));
                }
                if y > 0 {
                    assert!(integral.at(y, x) >= integral.at(y - 1, x));
                }
            }
        }
    }

    #[test]
    fn fractional_coordinates_truncate_within_a_pixel() {
        let integral = IntegralImage::from_edge_map(&checker_map(20, 20));
        let exact = score(&integral, &RoiBox::new(2.0, 3.0, 11.0, 15.0));
        let jittered = score(&integral, &RoiBox::new(2.9, 3.4, 11.99, 15.5));
        assert_eq!(exact, jittered);
        let next = score(&integral, &RoiBox::new(3.0, 3.0, 11.0, 15.0));
        assert_ne!(exact, next);
    }

    #[test]
    fn out_of_range_coordinates_are_clamped() {
        let integral = IntegralImage::from_edge_map(&EdgeMap::filled(10, 10, 1));
        let roi = RoiBox::new(-5.0, -5.0, 50.0, 50.0);
        assert_eq!(score(&integral, &roi), 100.0);
    }

    #[test]
    fn build_rejects_two_channel_input() {
        let data = vec![0u8; 8 * 8 * 2];
        let view = ImageU8::packed(8, 8, 2, &data);
        assert!(build_integral(&view, &EdgeOptions::default()).is_err());
    }

    #[test]
    fn build_from_flat_rgba_is_empty() {
        let data = vec![200u8; 16 * 12 * 4];
        let view = ImageU8::packed(16, 12, 4, &data);
        let integral = build_integral(&view, &EdgeOptions::default()).unwrap();
        assert_eq!(integral.image_size(), ImageSize::new(16, 12));
        assert_eq!(integral.total(), 0.0);
    }
}
