// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segment orientation → normalized angle, with the near-horizontal noise filter.

use cardangle_core::config::{AngleConfig, DEFAULT_NOISE_MAX_DEG, DEFAULT_NOISE_MIN_DEG};
use cardangle_core::LineSegment;

/// Open interval of raw angles (degrees, [0, 180) domain) that are kept.
///
/// Anything at or below `min_exclusive`, or at or above `max_exclusive`, is
/// dropped as near-horizontal background noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseFilter {
    pub min_exclusive: f64,
    pub max_exclusive: f64,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self {
            min_exclusive: DEFAULT_NOISE_MIN_DEG,
            max_exclusive: DEFAULT_NOISE_MAX_DEG,
        }
    }
}

impl NoiseFilter {
    pub fn from_config(config: &AngleConfig) -> Self {
        Self {
            min_exclusive: config.noise_min_deg,
            max_exclusive: config.noise_max_deg,
        }
    }

    #[inline]
    pub fn accepts(&self, raw: f64) -> bool {
        raw > self.min_exclusive && raw < self.max_exclusive
    }
}

/// Converts detector segments into signed deviations from horizontal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngleNormalizer {
    filter: NoiseFilter,
}

impl AngleNormalizer {
    pub fn new(filter: NoiseFilter) -> Self {
        Self { filter }
    }

    /// Map a raw angle in [0, 180) to (-90, 90]: values above 90 lose 180.
    #[inline]
    pub fn normalize(raw: f64) -> f64 {
        if raw <= 90.0 { raw } else { raw - 180.0 }
    }

    /// Normalized angle of one segment, or `None` if the filter rejects it.
    pub fn normalize_segment(&self, segment: &LineSegment) -> Option<f64> {
        let raw = segment.raw_angle();
        self.filter.accepts(raw).then(|| Self::normalize(raw))
    }

    /// Normalized angles of every accepted segment. An empty result means
    /// "no signal" and is not an error.
    pub fn normalize_all(&self, segments: &[LineSegment]) -> Vec<f64> {
        segments
            .iter()
            .filter_map(|seg| self.normalize_segment(seg))
            .collect()
    }
}
