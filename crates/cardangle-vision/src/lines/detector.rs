// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge/line detection capability and its Canny + Hough implementation.

use cardangle_core::{DetectorConfig, LineSegment};
use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::hough::{LineDetectionOptions, detect_lines};
use tracing::{debug, instrument};

use super::trace::{TraceOptions, trace_segments};

/// Grayscale intensity field → straight line segments.
///
/// Implementations must be deterministic for a fixed image and configuration,
/// and may return an empty set when the image has no linear structure.
pub trait EdgeLineDetector {
    fn detect_segments(&self, gray: &GrayImage) -> Vec<LineSegment>;
}

impl<T: EdgeLineDetector + ?Sized> EdgeLineDetector for &T {
    fn detect_segments(&self, gray: &GrayImage) -> Vec<LineSegment> {
        (**self).detect_segments(gray)
    }
}

impl<T: EdgeLineDetector + ?Sized> EdgeLineDetector for Box<T> {
    fn detect_segments(&self, gray: &GrayImage) -> Vec<LineSegment> {
        (**self).detect_segments(gray)
    }
}

/// Default detector: Gaussian blur, Canny edges, Hough voting, then each
/// voted line is traced over the edge map to recover finite segments.
#[derive(Debug, Clone, Default)]
pub struct HoughSegmentDetector {
    config: DetectorConfig,
}

impl HoughSegmentDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Blurred Canny edge map of `gray` (edge pixels are 255).
    pub fn edge_map(&self, gray: &GrayImage) -> GrayImage {
        let blurred = gaussian_blur_f32(gray, self.config.blur_sigma);
        canny(&blurred, self.config.canny_low, self.config.canny_high)
    }

    fn trace_options(&self) -> TraceOptions {
        TraceOptions {
            min_line_length: self.config.min_line_length,
            max_line_gap: self.config.max_line_gap,
            tolerance: self.config.trace_tolerance,
        }
    }
}

impl EdgeLineDetector for HoughSegmentDetector {
    #[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
    fn detect_segments(&self, gray: &GrayImage) -> Vec<LineSegment> {
        if gray.width() == 0 || gray.height() == 0 {
            return Vec::new();
        }

        let edges = self.edge_map(gray);
        let options = LineDetectionOptions {
            vote_threshold: self.config.vote_threshold,
            suppression_radius: self.config.suppression_radius,
        };
        let lines = detect_lines(&edges, options);
        debug!(line_count = lines.len(), "Hough lines detected");

        let trace = self.trace_options();
        let segments: Vec<LineSegment> = lines
            .iter()
            .flat_map(|line| trace_segments(&edges, line, trace))
            .collect();
        debug!(segment_count = segments.len(), "Segments traced");
        segments
    }
}
