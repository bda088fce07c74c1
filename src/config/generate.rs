use crate::color::ColorOptions;
use crate::edges::EdgeOptions;
use crate::error::{Result, SynthError};
use crate::sampler::TextBoxOptions;
use crate::text::CorpusConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Batch generation run, as read from `synth_gen <config.json>`.
#[derive(Clone, Debug, Deserialize)]
pub struct GeneratorConfig {
    pub backgrounds_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub corpus: CorpusConfig,
    pub output: OutputLayout,
    #[serde(default = "default_samples_per_background")]
    pub samples_per_background: usize,
    /// Nominal size fonts are parsed at; placement picks its own sizes.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Random when absent; the chosen value is written to the report.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub sample: SampleSettings,
}

fn default_samples_per_background() -> usize {
    1
}

fn default_font_size() -> f32 {
    32.0
}

/// Where rendered samples, labels and the batch report go.
#[derive(Clone, Debug, Deserialize)]
pub struct OutputLayout {
    pub dir: PathBuf,
    #[serde(default = "default_images_subdir")]
    pub images_subdir: String,
    #[serde(default = "default_labels_subdir")]
    pub labels_subdir: String,
    #[serde(default = "default_report_name")]
    pub report: String,
}

fn default_images_subdir() -> String {
    "images".to_string()
}

fn default_labels_subdir() -> String {
    "labels".to_string()
}

fn default_report_name() -> String {
    "report.json".to_string()
}

impl OutputLayout {
    pub fn images_dir(&self) -> PathBuf {
        self.dir.join(&self.images_subdir)
    }

    pub fn labels_dir(&self) -> PathBuf {
        self.dir.join(&self.labels_subdir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report)
    }
}

/// Knobs applied to every generated sample.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SampleSettings {
    pub boxes_per_image: usize,
    pub edge: EdgeOptions,
    pub text_boxes: TextBoxOptions,
    pub color: ColorOptions,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            boxes_per_image: 10,
            edge: EdgeOptions::default(),
            text_boxes: TextBoxOptions::default(),
            color: ColorOptions::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let data = fs::read_to_string(path).map_err(|e| SynthError::io(path, e))?;
    let config: GeneratorConfig =
        serde_json::from_str(&data).map_err(|e| SynthError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    config.sample.edge.validate().map_err(|e| SynthError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(config)
}
