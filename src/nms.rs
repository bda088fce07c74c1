//! Greedy non-maximum suppression over axis-aligned boxes.
use crate::types::RoiBox;
use std::cmp::Ordering;

/// Indices of the boxes that survive suppression, best score first.
///
/// Boxes are visited by descending score (stable, so ties keep input
/// order). Each kept box removes every remaining box whose IoU with it is
/// strictly above `iou_threshold`: `0.0` forbids any positive overlap and
/// `1.0` keeps everything. NaN scores sort last.
///
/// `boxes` and `scores` must have the same length; extra entries of the
/// longer slice are ignored.
pub fn nms(boxes: &[RoiBox], scores: &[f32], iou_threshold: f32) -> Vec<usize> {
    let n = boxes.len().min(scores.len());
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| descending(scores[a], scores[b]));

    let mut keep = Vec::new();
    let mut suppressed = vec![false; n];
    for (pos, &i) in order.iter().enumerate() {
        if suppressed[i] {
            continue;
        }
        keep.push(i);
        for &j in order.iter().skip(pos + 1) {
            if !suppressed[j] && boxes[i].iou(&boxes[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }
    keep
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
