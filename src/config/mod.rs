//! JSON configuration consumed by the command-line tools.
pub mod generate;
pub mod roi_demo;

pub use generate::{load_config, GeneratorConfig, OutputLayout, SampleSettings};
