//! Sample generation: one background in, rendered text and labels out.
//!
//! `generate_sample` runs the in-memory pipeline (integral image, placement,
//! color, drawing). `run_batch` drives it over every background found on
//! disk in parallel, giving each job its own RNG derived from the batch seed
//! so that results do not depend on thread scheduling.
use crate::color::pick_text_color;
use crate::config::{GeneratorConfig, SampleSettings};
use crate::diagnostics::{elapsed_ms, BatchReport, SampleReport, TimingBreakdown};
use crate::error::{Result, SynthError};
use crate::files::find_images;
use crate::image::io::{load_image, save_rgb_image, write_json_file};
use crate::image::ImageU8;
use crate::integral::build_integral;
use crate::render::{draw_placements, rgb_canvas, SampleLabel, StyledPlacement};
use crate::sampler::{sample_many_text_boxes, TextBoxOptions};
use crate::text::{Corpus, GlyphFont, MeasureText, TextSource};
use crate::types::ImageSize;
use image::RgbImage;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Consecutive oversized texts tolerated before a draw fails.
pub const MAX_TEXT_REDRAWS: usize = 100;

/// Text source that skips strings some font cannot place on the image even
/// at the smallest configured size.
///
/// `sample_box` retries such strings forever, so corpus text is screened
/// here before it reaches the sampler.
pub struct FittingTexts<'a, T, F> {
    inner: &'a mut T,
    fonts: &'a [F],
    image_size: ImageSize,
    min_font_size: f32,
    rejected: usize,
}

impl<'a, T, F: MeasureText> FittingTexts<'a, T, F> {
    pub fn new(
        inner: &'a mut T,
        fonts: &'a [F],
        image_size: ImageSize,
        options: &TextBoxOptions,
    ) -> Self {
        let (lo, hi) = options.font_size_range;
        Self {
            inner,
            fonts,
            image_size,
            min_font_size: lo.min(hi) as f32,
            rejected: 0,
        }
    }

    /// Texts skipped so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    fn fits(&self, text: &str) -> bool {
        let (w, h) = (self.image_size.width as f32, self.image_size.height as f32);
        self.fonts.iter().all(|font| {
            let extent = font.text_bbox(text, self.min_font_size);
            extent.width() < w && extent.height() < h
        })
    }
}

impl<T: TextSource, F: MeasureText> TextSource for FittingTexts<'_, T, F> {
    fn next_text<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
        for _ in 0..MAX_TEXT_REDRAWS {
            let text = self.inner.next_text(rng)?;
            if self.fits(&text) {
                return Ok(text);
            }
            self.rejected += 1;
            warn!(
                "{:?} does not fit a {}x{} image at size {}, drawing another text",
                text, self.image_size.width, self.image_size.height, self.min_font_size
            );
        }
        Err(SynthError::InvalidParameter(format!(
            "{} texts in a row do not fit a {}x{} image at size {}",
            MAX_TEXT_REDRAWS, self.image_size.width, self.image_size.height, self.min_font_size
        )))
    }
}

/// Rendered sample before it is written anywhere.
#[derive(Debug)]
pub struct GeneratedSample {
    pub image: RgbImage,
    pub placements: Vec<StyledPlacement<GlyphFont>>,
    pub skipped_colors: usize,
    pub timing: TimingBreakdown,
}

/// Place, color and draw text on one background.
///
/// Texts too large for the background are skipped through [`FittingTexts`].
/// Placements whose background patch admits no text color are dropped with
/// a warning.
pub fn generate_sample<T, R>(
    background: &ImageU8<'_>,
    fonts: &[GlyphFont],
    texts: &mut T,
    settings: &SampleSettings,
    rng: &mut R,
) -> Result<GeneratedSample>
where
    T: TextSource,
    R: Rng + ?Sized,
{
    let total_start = Instant::now();
    let mut timing = TimingBreakdown::default();

    let integral = build_integral(background, &settings.edge)?;
    let stage = timing.lap("integral", total_start);

    let size = ImageSize::new(background.w, background.h);
    let mut fitting = FittingTexts::new(texts, fonts, size, &settings.text_boxes);
    let placements = sample_many_text_boxes(
        size,
        &integral,
        settings.boxes_per_image,
        fonts,
        &mut fitting,
        &settings.text_boxes,
        rng,
    )?;
    let stage = timing.lap("placement", stage);

    let mut styled = Vec::with_capacity(placements.len());
    let mut skipped_colors = 0usize;
    for placement in placements {
        let roi = placement.roi;
        let patch = background.crop(
            roi.x1 as usize,
            roi.y1 as usize,
            roi.width().ceil() as usize,
            roi.height().ceil() as usize,
        );
        match pick_text_color(&patch, &settings.color, rng) {
            Some(color) => styled.push(StyledPlacement { placement, color }),
            None => {
                warn!(
                    "no text color found for {:?} ({:?}), dropping \"{}\"",
                    roi.as_array(),
                    settings.color,
                    placement.text
                );
                skipped_colors += 1;
            }
        }
    }
    let stage = timing.lap("color", stage);

    let mut image = rgb_canvas(background);
    draw_placements(&mut image, &styled);
    timing.lap("render", stage);

    timing.total_ms = elapsed_ms(total_start);
    debug!(
        "generate_sample: {}x{} -> {} boxes ({} without color) in {:.3} ms",
        background.w,
        background.h,
        styled.len(),
        skipped_colors,
        timing.total_ms
    );
    Ok(GeneratedSample {
        image,
        placements: styled,
        skipped_colors,
        timing,
    })
}

/// Per-job seed; distinct jobs get well separated streams.
#[inline]
pub fn job_seed(batch_seed: u64, job: usize) -> u64 {
    batch_seed ^ (job as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Output file stem for a job: zero-padded index plus the background name.
pub fn sample_stem(job: usize, background: &Path) -> String {
    let name = background
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "background".to_string());
    format!("{job:06}_{name}")
}

/// Render `samples_per_background` samples for every image under
/// `backgrounds_dir` and write PNG + JSON label pairs.
///
/// The first failing job aborts the batch with its error.
pub fn run_batch(
    config: &GeneratorConfig,
    fonts: &[GlyphFont],
    corpus: &Corpus,
) -> Result<BatchReport> {
    if fonts.is_empty() {
        return Err(SynthError::NoFonts);
    }
    let backgrounds = find_images(&config.backgrounds_dir)?;
    if backgrounds.is_empty() {
        return Err(SynthError::InvalidParameter(format!(
            "no background images under {}",
            config.backgrounds_dir.display()
        )));
    }
    let seed = config.seed.unwrap_or_else(rand::random);
    let per_bg = config.samples_per_background;
    let jobs = backgrounds.len() * per_bg;
    info!(
        "run_batch: {} backgrounds x {} samples, {} fonts, seed {}",
        backgrounds.len(),
        per_bg,
        fonts.len(),
        seed
    );

    let start = Instant::now();
    let samples = (0..jobs)
        .into_par_iter()
        .map(|job| {
            let background = &backgrounds[job / per_bg];
            run_job(config, fonts, corpus, background, job, job_seed(seed, job))
        })
        .collect::<Result<Vec<SampleReport>>>()?;

    let mut timing = TimingBreakdown::default();
    for sample in &samples {
        timing.accumulate(&sample.timing);
    }
    timing.total_ms = elapsed_ms(start);

    Ok(BatchReport {
        seed,
        backgrounds: backgrounds.len(),
        total_boxes: samples.iter().map(|s| s.boxes).sum(),
        samples,
        timing,
    })
}

fn run_job(
    config: &GeneratorConfig,
    fonts: &[GlyphFont],
    corpus: &Corpus,
    background: &Path,
    job: usize,
    seed: u64,
) -> Result<SampleReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut texts = corpus.fork(&mut rng);

    let load_start = Instant::now();
    let owned = load_image(background)?;
    let load_ms = elapsed_ms(load_start);

    let sample = generate_sample(
        &owned.as_view(),
        fonts,
        &mut texts,
        &config.sample,
        &mut rng,
    )?;

    let stem = sample_stem(job, background);
    let image_path = config.output.images_dir().join(format!("{stem}.png"));
    let label_path = config.output.labels_dir().join(format!("{stem}.json"));

    let write_start = Instant::now();
    save_rgb_image(&sample.image, &image_path)?;
    let label = SampleLabel::new(
        file_name(&image_path),
        owned.width(),
        owned.height(),
        &sample.placements,
    );
    write_json_file(&label_path, &label)?;

    let mut timing = TimingBreakdown::default();
    timing.push("load", load_ms);
    for stage in &sample.timing.stages {
        timing.push(stage.label.clone(), stage.elapsed_ms);
    }
    timing.push("write", elapsed_ms(write_start));
    timing.total_ms = elapsed_ms(load_start);

    Ok(SampleReport {
        background: background.to_path_buf(),
        image: image_path,
        label: label_path,
        boxes: sample.placements.len(),
        skipped_colors: sample.skipped_colors,
        timing,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
