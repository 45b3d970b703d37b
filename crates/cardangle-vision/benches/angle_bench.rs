// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the cardangle-vision crate: the histogram mode
// estimator on its own, and the full detect → estimate pipeline on a small
// synthetic card image.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use cardangle_core::AngleConfig;
use cardangle_vision::{AnglePipeline, DominantAngleEstimator, HoughSegmentDetector};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark the 180-bin estimator over a few thousand angles spread across
/// the normalized range with a dominant cluster near 25°.
fn bench_dominant_angle(c: &mut Criterion) {
    let angles: Vec<f64> = (0..4000)
        .map(|i| {
            if i % 3 == 0 {
                25.0 + (i % 7) as f64 * 0.1
            } else {
                -89.0 + (i % 178) as f64
            }
        })
        .collect();
    let estimator = DominantAngleEstimator::default();

    c.bench_function("dominant_angle (4000 angles)", |b| {
        b.iter(|| black_box(estimator.estimate(black_box(&angles))));
    });
}

/// Benchmark the full pipeline on a 240x240 image containing a light
/// rectangle rotated by 20° on a dark background.
fn bench_pipeline(c: &mut Criterion) {
    let (width, height) = (240u32, 240u32);
    let mut img = GrayImage::from_pixel(width, height, Luma([30u8]));
    let (sin, cos) = 20f64.to_radians().sin_cos();
    let corner = |u: f64, v: f64| {
        Point::new(
            (120.0 + u * cos - v * sin).round() as i32,
            (120.0 + u * sin + v * cos).round() as i32,
        )
    };
    let poly = [
        corner(-80.0, -45.0),
        corner(80.0, -45.0),
        corner(80.0, 45.0),
        corner(-80.0, 45.0),
    ];
    draw_polygon_mut(&mut img, &poly, Luma([225u8]));

    let pipeline = AnglePipeline::new(HoughSegmentDetector::default(), &AngleConfig::default());

    c.bench_function("pipeline (240x240 card)", |b| {
        b.iter(|| black_box(pipeline.estimate_gray(black_box(&img))));
    });
}

criterion_group!(benches, bench_dominant_angle, bench_pipeline);
criterion_main!(benches);
