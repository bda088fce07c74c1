use serde::{Deserialize, Serialize};

/// Image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box `(x1, y1, x2, y2)` in pixel coordinates.
///
/// Well-formed boxes satisfy `x1 <= x2` and `y1 <= y2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl RoiBox {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Area with negative extents treated as empty.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    #[inline]
    pub fn has_negative(&self) -> bool {
        self.x1 < 0.0 || self.y1 < 0.0 || self.x2 < 0.0 || self.y2 < 0.0
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// True when the box lies inside `[0, W) x [0, H)`.
    pub fn fits_within(&self, size: ImageSize) -> bool {
        !self.has_negative()
            && self.is_ordered()
            && self.x2 < size.width as f32
            && self.y2 < size.height as f32
    }

    /// Grow the box by `border` pixels on every side.
    #[inline]
    pub fn inflate(&self, border: f32) -> Self {
        Self::new(
            self.x1 - border,
            self.y1 - border,
            self.x2 + border,
            self.y2 + border,
        )
    }

    /// Inverse of [`RoiBox::inflate`].
    #[inline]
    pub fn deflate(&self, border: f32) -> Self {
        self.inflate(-border)
    }

    /// Intersection-over-union on continuous coordinates.
    pub fn iou(&self, other: &RoiBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        if ix2 <= ix1 || iy2 <= iy1 {
            return 0.0;
        }
        let inter = (ix2 - ix1) * (iy2 - iy1);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// Candidate box with its edge-density score and NMS priority.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoredBox {
    pub roi: RoiBox,
    /// Edge pixels inside the box.
    pub score: f32,
    pub priority: Option<f32>,
}

impl ScoredBox {
    pub fn new(roi: RoiBox, score: f32) -> Self {
        Self {
            roi,
            score,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = RoiBox::new(1.0, 2.0, 11.0, 12.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = RoiBox::new(0.0, 0.0, 10.0, 10.0);
        let b = RoiBox::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn half_overlap() {
        let a = RoiBox::new(0.0, 0.0, 10.0, 10.0);
        let b = RoiBox::new(5.0, 0.0, 15.0, 10.0);
        assert!((a.iou(&b) - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn inflate_then_deflate_restores_integer_box() {
        let b = RoiBox::new(3.0, 7.0, 40.0, 52.0);
        assert_eq!(b.inflate(5.0).deflate(5.0), b);
    }

    #[test]
    fn fits_within_rejects_far_edge() {
        let size = ImageSize::new(10, 10);
        assert!(RoiBox::new(0.0, 0.0, 9.0, 9.0).fits_within(size));
        assert!(!RoiBox::new(0.0, 0.0, 10.0, 9.0).fits_within(size));
        assert!(!RoiBox::new(-1.0, 0.0, 5.0, 5.0).fits_within(size));
    }
}
