//! Box placement on top of an edge-density integral image.
//!
//! Two samplers share the same shape: draw independent candidates, reject the
//! ones that cover too many edge pixels, and resolve overlaps with NMS.
//!
//! - [`text_box`]: boxes sized by measuring a string at a random font size,
//!   with bounded rejection sampling per box.
//! - [`roi`]: boxes shaped by a scale/aspect-ratio draw, ranked by smoothness.

pub mod roi;
pub mod text_box;

pub use roi::{sample_multi_roi, sample_multi_roi_scored, sample_roi, RoiOptions};
pub use text_box::{
    sample_box, sample_many_text_boxes, Placement, TextBoxOptions, TextBoxSample,
};
