mod common;

use common::fixtures::{pairwise_iou, Mono, Repeat};
use common::synthetic_image::{half_checker_rgb, solid_rgb};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use synthtext_roi::edges::{detect_edges, EdgeMap, EdgeOptions};
use synthtext_roi::generator::FittingTexts;
use synthtext_roi::text::LineCorpus;
use synthtext_roi::image::ImageU8;
use synthtext_roi::{
    build_integral, sample_box, sample_many_text_boxes, sample_multi_roi, score, ImageSize,
    IntegralImage, Parameter, RoiBox, RoiOptions, TextBoxOptions,
};

fn brute_count(edges: &EdgeMap, roi: &RoiBox) -> usize {
    let clamp = |v: f32, max: usize| (v.max(0.0) as usize).min(max);
    let (x1, x2) = (clamp(roi.x1, edges.w), clamp(roi.x2, edges.w));
    let (y1, y2) = (clamp(roi.y1, edges.h), clamp(roi.y2, edges.h));
    (y1..y2)
        .flat_map(|y| (x1..x2).map(move |x| (x, y)))
        .map(|(x, y)| edges.get(x, y) as usize)
        .sum()
}

#[test]
fn flat_image_yields_disjoint_boxes() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(11);
    let integral = IntegralImage::from_edge_map(&EdgeMap::filled(100, 100, 0));
    let size = integral.image_size();
    let options = TextBoxOptions {
        max_integral: 20.0,
        ..Default::default()
    };

    let placed = sample_many_text_boxes(
        size,
        &integral,
        5,
        &[Mono],
        &mut Repeat("ab cd"),
        &options,
        &mut rng,
    )
    .unwrap();

    assert!(!placed.is_empty());
    assert!(placed.len() <= 5);
    let boxes: Vec<RoiBox> = placed.iter().map(|p| p.roi).collect();
    assert!(pairwise_iou(&boxes).iter().all(|&v| v == 0.0));
    for p in &placed {
        assert!(p.roi.fits_within(size), "{:?}", p.roi);
        assert_eq!(p.text, "ab cd");
        assert!((10..=100).contains(&p.font_size));
        // Mono height equals the font size; the accepted height window is
        // [0.05, 0.5] of the image height.
        assert!(p.roi.height() >= 5.0 && p.roi.height() <= 50.0);
    }
}

#[test]
fn unreachable_density_gives_none() {
    let mut rng = StdRng::seed_from_u64(12);
    let integral = IntegralImage::from_edge_map(&EdgeMap::filled(100, 100, 0));
    let options = TextBoxOptions {
        max_integral: -1.0,
        max_loop: 10,
        ..Default::default()
    };
    let found = sample_box(
        integral.image_size(),
        &integral,
        "hello",
        &Mono,
        &options,
        &mut rng,
    );
    assert!(found.is_none());
}

#[test]
fn textured_half_is_respected_by_text_boxes() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (200usize, 120usize);
    let data = half_checker_rgb(w, h, 100, 8, [200, 210, 190]);
    let image = ImageU8::packed(w, h, 3, &data);
    let edge_opts = EdgeOptions::default();

    let edges = detect_edges(&image, &edge_opts).unwrap();
    let count_cols = |cols: std::ops::Range<usize>| -> usize {
        (0..h)
            .map(|y| edges.row(y)[cols.clone()].iter().map(|&v| v as usize).sum::<usize>())
            .sum()
    };
    let left = count_cols(0..100);
    let right = count_cols(110..w);
    assert!(left > 100, "checkerboard produced only {left} edge pixels");
    assert_eq!(right, 0);

    let integral = build_integral(&image, &edge_opts).unwrap();
    let options = TextBoxOptions {
        max_integral: 0.0,
        max_loop: 2000,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(13);
    let placed = sample_many_text_boxes(
        integral.image_size(),
        &integral,
        8,
        &[Mono],
        &mut Repeat("ab"),
        &options,
        &mut rng,
    )
    .unwrap();

    assert!(!placed.is_empty());
    for p in &placed {
        assert_eq!(score(&integral, &p.roi), 0.0);
        assert_eq!(brute_count(&edges, &p.roi), 0, "{:?}", p.roi);
    }
}

#[test]
fn scores_match_brute_force_on_a_real_edge_map() {
    let (w, h) = (64usize, 48usize);
    let data = half_checker_rgb(w, h, 40, 6, [90, 90, 90]);
    let image = ImageU8::packed(w, h, 3, &data);
    let edges = detect_edges(&image, &EdgeOptions::default()).unwrap();
    let integral = IntegralImage::from_edge_map(&edges);

    let mut rng = StdRng::seed_from_u64(14);
    for _ in 0..200 {
        let roi = synthtext_roi::sample_roi(
            ImageSize::new(w, h),
            &Parameter::Range(0.1, 0.9),
            &Parameter::Range(0.3, 3.0),
            &mut rng,
        )
        .unwrap();
        assert_eq!(score(&integral, &roi) as usize, brute_count(&edges, &roi));
    }
    assert_eq!(integral.total() as usize, edges.edge_count());
}

#[test]
fn regions_keep_their_border_apart() {
    let data = solid_rgb(160, 120, [128, 128, 128]);
    let image = ImageU8::packed(160, 120, 3, &data);
    let integral = build_integral(&image, &EdgeOptions::default()).unwrap();
    let border = 4u32;
    let options = RoiOptions {
        num_rois: 50,
        scales: Parameter::Range(0.1, 0.25),
        ratios: Parameter::Choices(vec![1.0, 1.5, 3.0]),
        border,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(15);
    let rois = sample_multi_roi(&integral, &options, &mut rng).unwrap();

    assert!(!rois.is_empty());
    let grown: Vec<RoiBox> = rois.iter().map(|r| r.inflate(border as f32)).collect();
    assert!(pairwise_iou(&grown).iter().all(|&v| v == 0.0));
    for roi in &rois {
        assert!(roi.fits_within(integral.image_size()));
        assert_eq!(roi.inflate(border as f32).deflate(border as f32), *roi);
    }
}

#[test]
fn seeded_pipeline_is_reproducible() {
    let data = half_checker_rgb(120, 90, 50, 5, [240, 240, 240]);
    let image = ImageU8::packed(120, 90, 3, &data);
    let integral = build_integral(&image, &EdgeOptions::default()).unwrap();
    let run = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        sample_many_text_boxes(
            integral.image_size(),
            &integral,
            6,
            &[Mono],
            &mut Repeat("hi"),
            &TextBoxOptions::default(),
            &mut rng,
        )
        .unwrap()
        .into_iter()
        .map(|p| p.roi)
        .collect::<Vec<_>>()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn lines_wider_than_the_image_are_skipped() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let integral = IntegralImage::from_edge_map(&EdgeMap::filled(160, 120, 0));
        let mut corpus =
            LineCorpus::from_text("short\nthe quick brown fox jumps over the lazy dog").unwrap();
        let fonts = [Mono];
        let options = TextBoxOptions::default();
        let size = integral.image_size();
        let mut rng = StdRng::seed_from_u64(3);
        let mut texts = FittingTexts::new(&mut corpus, &fonts, size, &options);
        let placed =
            sample_many_text_boxes(size, &integral, 10, &fonts, &mut texts, &options, &mut rng);
        let _ = tx.send(placed.map(|p| p.into_iter().map(|p| p.text).collect::<Vec<_>>()));
    });

    let texts = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("sampling did not finish")
        .unwrap();
    assert!(!texts.is_empty());
    assert!(texts.iter().all(|t| t == "short"), "{texts:?}");
}
