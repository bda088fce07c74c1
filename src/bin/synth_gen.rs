use std::env;
use std::path::Path;
use synthtext_roi::config::generate::load_config;
use synthtext_roi::diagnostics::BatchReport;
use synthtext_roi::generator::run_batch;
use synthtext_roi::image::io::write_json_file;
use synthtext_roi::text::{Corpus, FontLibrary};

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

    let fonts =
        FontLibrary::load_dir(&config.fonts_dir, config.font_size).map_err(|e| e.to_string())?;
    let corpus = Corpus::load(&config.corpus).map_err(|e| e.to_string())?;
    let report = run_batch(&config, fonts.fonts(), &corpus).map_err(|e| e.to_string())?;

    let report_path = config.output.report_path();
    write_json_file(&report_path, &report).map_err(|e| e.to_string())?;

    print_summary(&report);
    println!("Report written to {}", report_path.display());
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!("Generation summary");
    println!("  seed: {}", report.seed);
    println!("  backgrounds: {}", report.backgrounds);
    println!("  samples: {}", report.samples.len());
    println!("  boxes: {}", report.total_boxes);
    let skipped: usize = report.samples.iter().map(|s| s.skipped_colors).sum();
    if skipped > 0 {
        println!("  boxes without a usable color: {skipped}");
    }
    println!("  wall time: {:.1} ms", report.timing.total_ms);
    let samples = report.samples.len().max(1) as f64;
    for stage in &report.timing.stages {
        println!(
            "    {:<10} {:>9.3} ms/sample",
            stage.label,
            stage.elapsed_ms / samples
        );
    }
}

fn usage() -> String {
    "Usage: synth_gen <config.json>".to_string()
}
