// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-image rotation estimation: detector → normalizer → histogram mode.

use std::path::Path;

use cardangle_core::error::CardAngleError;
use cardangle_core::{AngleConfig, AngleEstimate, LineSegment};
use image::{DynamicImage, GrayImage};
use tracing::{debug, info, instrument};

use crate::angle::{AngleNormalizer, DominantAngleEstimator, NoiseFilter};
use crate::lines::EdgeLineDetector;

/// Segments found in one image together with the resulting estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Every segment the detector returned, unfiltered.
    pub segments: Vec<LineSegment>,
    pub estimate: AngleEstimate,
}

/// Stateless rotation estimator wrapping a line detector.
///
/// Nothing is retained between calls, so images can be processed in any
/// order with identical results.
pub struct AnglePipeline<D> {
    detector: D,
    normalizer: AngleNormalizer,
    estimator: DominantAngleEstimator,
}

impl<D: EdgeLineDetector> AnglePipeline<D> {
    /// Build a pipeline. Panics if `config.bin_count` is zero; callers
    /// validate configuration first.
    pub fn new(detector: D, config: &AngleConfig) -> Self {
        Self {
            detector,
            normalizer: AngleNormalizer::new(NoiseFilter::from_config(config)),
            estimator: DominantAngleEstimator::new(config.bin_count),
        }
    }

    /// Estimate from an already-detected segment set.
    pub fn estimate_segments(&self, segments: &[LineSegment]) -> AngleEstimate {
        let angles = self.normalizer.normalize_all(segments);
        if angles.is_empty() {
            debug!(detected = segments.len(), "No segments passed the noise filter");
            return AngleEstimate::no_detection(segments.len());
        }

        match self.estimator.estimate(&angles) {
            Some(dominant) => AngleEstimate {
                angle: Some(dominant.degrees),
                segments_detected: segments.len(),
                segments_accepted: angles.len(),
                dominant_votes: dominant.votes,
            },
            None => AngleEstimate {
                segments_accepted: angles.len(),
                ..AngleEstimate::no_detection(segments.len())
            },
        }
    }

    #[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
    pub fn estimate_gray(&self, gray: &GrayImage) -> PipelineOutput {
        let segments = self.detector.detect_segments(gray);
        let estimate = self.estimate_segments(&segments);
        debug!(
            detected = estimate.segments_detected,
            accepted = estimate.segments_accepted,
            angle = ?estimate.angle,
            "Image estimated"
        );
        PipelineOutput { segments, estimate }
    }

    pub fn estimate(&self, image: &DynamicImage) -> PipelineOutput {
        self.estimate_gray(&image.to_luma8())
    }

    /// Open `path` and estimate it, returning the decoded image for rendering.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn estimate_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(DynamicImage, PipelineOutput), CardAngleError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|err| {
            CardAngleError::ImageError(format!("failed to open {}: {}", path.display(), err))
        })?;
        info!(width = image.width(), height = image.height(), "Image loaded");
        let output = self.estimate(&image);
        Ok((image, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::HoughSegmentDetector;
    use crate::lines::detector::tests::synthetic_card;

    /// Detector returning a fixed segment list.
    struct FixedSegments(Vec<LineSegment>);

    impl EdgeLineDetector for FixedSegments {
        fn detect_segments(&self, _gray: &GrayImage) -> Vec<LineSegment> {
            self.0.clone()
        }
    }

    fn pipeline(segments: Vec<LineSegment>) -> AnglePipeline<FixedSegments> {
        AnglePipeline::new(FixedSegments(segments), &AngleConfig::default())
    }

    fn blank() -> GrayImage {
        GrayImage::new(4, 4)
    }

    #[test]
    fn no_segments_is_no_detection() {
        let out = pipeline(Vec::new()).estimate_gray(&blank());
        assert_eq!(out.estimate, AngleEstimate::no_detection(0));
        assert_eq!(out.estimate.sentinel_angle(), 0.0);
    }

    #[test]
    fn only_horizontal_segments_is_no_detection() {
        let segs = vec![LineSegment::new(0, 0, 300, 0); 25];
        let out = pipeline(segs).estimate_gray(&blank());
        assert_eq!(out.estimate.angle, None);
        assert_eq!(out.estimate.segments_detected, 25);
        assert_eq!(out.segments.len(), 25, "unfiltered segments kept for rendering");
    }

    #[test]
    fn mixed_segments_pick_the_majority_orientation() {
        let segs = vec![
            LineSegment::new(0, 0, 100, 0),       // horizontal, filtered
            LineSegment::new(0, 0, 100, 120),     // ~50.2°
            LineSegment::new(10, 0, 110, 120),    // ~50.2°
            LineSegment::new(0, 0, -100, 120),    // ~129.8° → ~-50.2°
            LineSegment::new(110, 120, 10, 0),    // ~50.2°, reversed
        ];
        let out = pipeline(segs).estimate_gray(&blank());
        let estimate = out.estimate;
        assert_eq!(estimate.segments_detected, 5);
        assert_eq!(estimate.segments_accepted, 4);
        assert_eq!(estimate.dominant_votes, 3);
        assert_eq!(estimate.angle, Some(50.5));
    }

    #[test]
    fn synthetic_card_angle_recovered() {
        let gray = synthetic_card(400, 400, 30.0);
        let pipeline = AnglePipeline::new(HoughSegmentDetector::default(), &AngleConfig::default());
        let out = pipeline.estimate_gray(&gray);
        let angle = out.estimate.angle.expect("card should be detected");
        // Long sides sit at 30°, short sides at 120° (normalized to -60°).
        assert!(
            (angle - 30.0).abs() <= 2.0 || (angle + 60.0).abs() <= 2.0,
            "unexpected angle {angle}"
        );
    }

    #[test]
    fn repeated_runs_agree() {
        let gray = synthetic_card(360, 360, 50.0);
        let pipeline = AnglePipeline::new(HoughSegmentDetector::default(), &AngleConfig::default());
        let first = pipeline.estimate_gray(&gray);
        let second = pipeline.estimate_gray(&gray);
        assert_eq!(first, second);
    }

    #[test]
    fn unreadable_path_is_an_image_error() {
        let pipeline = pipeline(Vec::new());
        let err = pipeline.estimate_path("/no/such/card.png").unwrap_err();
        assert!(matches!(err, CardAngleError::ImageError(_)));
    }
}
