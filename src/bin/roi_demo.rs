use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::env;
use std::path::Path;
use synthtext_roi::config::roi_demo::load_config;
use synthtext_roi::image::io::{load_image, save_rgb_image, write_json_file};
use synthtext_roi::sampler::sample_multi_roi_scored;
use synthtext_roi::{build_integral, ScoredBox};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let background = load_image(&config.input).map_err(|e| e.to_string())?;
    let view = background.as_view();
    let integral = build_integral(&view, &config.edge).map_err(|e| e.to_string())?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let rois = sample_multi_roi_scored(&integral, &config.roi, &mut rng)
        .map_err(|e| e.to_string())?;

    let mut overlay = background.to_rgb_image();
    for b in &rois {
        let w = b.roi.width().max(1.0) as u32;
        let h = b.roi.height().max(1.0) as u32;
        let rect = Rect::at(b.roi.x1 as i32, b.roi.y1 as i32).of_size(w, h);
        draw_hollow_rect_mut(&mut overlay, rect, Rgb([255, 32, 32]));
    }
    save_rgb_image(&overlay, &config.output.overlay).map_err(|e| e.to_string())?;

    let summary = RoiSummary {
        width: background.width(),
        height: background.height(),
        seed,
        edge_pixels: integral.total(),
        num_rois: config.roi.num_rois,
        rois,
    };
    write_json_file(&config.output.rois_json, &summary).map_err(|e| e.to_string())?;

    println!(
        "Kept {} of {} regions (seed {})",
        summary.rois.len(),
        summary.num_rois,
        seed
    );
    println!("Saved overlay to {}", config.output.overlay.display());
    println!("Saved regions to {}", config.output.rois_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: roi_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoiSummary {
    width: usize,
    height: usize,
    seed: u64,
    edge_pixels: f32,
    num_rois: usize,
    rois: Vec<ScoredBox>,
}
