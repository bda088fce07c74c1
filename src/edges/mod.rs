//! Edge maps: the binary masks whose density decides where text may go.
//!
//! - Gradient computation (Sobel/Scharr) on a luma plane.
//! - Binary edge operators: Canny (through `imageproc`) or a gradient
//!   magnitude operator with double thresholding.

pub mod detect;
pub mod grad;

pub use detect::{detect_edges, EdgeMap, EdgeOperator, EdgeOptions};
pub use grad::{gradient_magnitude, GradientKernel};
