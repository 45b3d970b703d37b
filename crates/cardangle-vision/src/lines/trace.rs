// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polar (Hough) line → endpoint segments, by walking the line across an
// edge map and keeping runs of edge pixels.

use cardangle_core::LineSegment;
use image::GrayImage;
use imageproc::hough::PolarLine;

/// Run-splitting parameters for [`trace_segments`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceOptions {
    /// Runs shorter than this (in pixels) are dropped.
    pub min_line_length: f32,
    /// Gaps up to this many pixels are bridged.
    pub max_line_gap: f32,
    /// Chebyshev radius around each sample that counts as a hit.
    pub tolerance: u32,
}

/// Clip the infinite line `p0 + t*dir` to `[0, w-1] x [0, h-1]`.
///
/// Returns the parameter interval, or `None` if the line misses the image.
fn clip_to_image(p0: (f64, f64), dir: (f64, f64), width: u32, height: u32) -> Option<(f64, f64)> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;
    let bounds = [
        (p0.0, dir.0, f64::from(width) - 1.0),
        (p0.1, dir.1, f64::from(height) - 1.0),
    ];
    for (origin, delta, upper) in bounds {
        if delta.abs() < 1e-12 {
            if origin < 0.0 || origin > upper {
                return None;
            }
            continue;
        }
        let a = -origin / delta;
        let b = (upper - origin) / delta;
        t_min = t_min.max(a.min(b));
        t_max = t_max.min(a.max(b));
    }
    (t_min <= t_max).then_some((t_min, t_max))
}

/// Whether an edge pixel exists within `tolerance` of `(x, y)`.
fn edge_near(edges: &GrayImage, x: i64, y: i64, tolerance: u32) -> bool {
    let (width, height) = (i64::from(edges.width()), i64::from(edges.height()));
    let tol = i64::from(tolerance);
    for ny in (y - tol).max(0)..=(y + tol).min(height - 1) {
        for nx in (x - tol).max(0)..=(x + tol).min(width - 1) {
            if edges.get_pixel(nx as u32, ny as u32).0[0] > 0 {
                return true;
            }
        }
    }
    false
}

/// Extract segments supported by `edges` along one Hough line.
///
/// The line `x*cos(θ) + y*sin(θ) = r` is sampled at one-pixel steps. Each
/// maximal run of hits whose internal gaps never exceed `max_line_gap` and
/// whose length reaches `min_line_length` becomes one segment, with its
/// endpoints at the first and last hit.
pub fn trace_segments(edges: &GrayImage, line: &PolarLine, options: TraceOptions) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let theta = f64::from(line.angle_in_degrees).to_radians();
    let (sin, cos) = theta.sin_cos();
    let r = f64::from(line.r);
    let p0 = (r * cos, r * sin);
    let dir = (-sin, cos);

    let Some((t_start, t_end)) = clip_to_image(p0, dir, width, height) else {
        return Vec::new();
    };

    let point_at = |t: f64| -> (i64, i64) {
        (
            (p0.0 + t * dir.0).round() as i64,
            (p0.1 + t * dir.1).round() as i64,
        )
    };

    let min_len = f64::from(options.min_line_length);
    let max_gap = f64::from(options.max_line_gap);
    let mut segments = Vec::new();
    let mut run: Option<(f64, f64)> = None;

    let close_run = |first: f64, last: f64, segments: &mut Vec<LineSegment>| {
        if last - first >= min_len {
            let (x1, y1) = point_at(first);
            let (x2, y2) = point_at(last);
            segments.push(LineSegment::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32));
        }
    };

    let steps = (t_end - t_start).floor() as i64;
    for step in 0..=steps {
        let t = t_start + step as f64;
        let (x, y) = point_at(t);
        if !edge_near(edges, x, y, options.tolerance) {
            continue;
        }
        run = match run {
            Some((first, last)) if t - last <= max_gap + 1.0 => Some((first, t)),
            Some((first, last)) => {
                close_run(first, last, &mut segments);
                Some((t, t))
            }
            None => Some((t, t)),
        };
    }
    if let Some((first, last)) = run {
        close_run(first, last, &mut segments);
    }

    segments
}
