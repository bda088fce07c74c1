use crate::edges::EdgeOptions;
use crate::error::{Result, SynthError};
use crate::sampler::RoiOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct RoiDemoConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub edge: EdgeOptions,
    #[serde(default)]
    pub roi: RoiOptions,
    pub output: RoiDemoOutput,
}

#[derive(Debug, Deserialize)]
pub struct RoiDemoOutput {
    /// Background with every surviving region outlined.
    pub overlay: PathBuf,
    pub rois_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<RoiDemoConfig> {
    let data = fs::read_to_string(path).map_err(|e| SynthError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| SynthError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
