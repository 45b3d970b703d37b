// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-range orientation histogram and first-max mode selection.

use cardangle_core::config::DEFAULT_BIN_COUNT;
use tracing::debug;

/// Lower edge of the normalized-angle range, in degrees.
pub const RANGE_MIN_DEG: f64 = -90.0;
/// Upper edge of the normalized-angle range, in degrees. Inclusive.
pub const RANGE_MAX_DEG: f64 = 90.0;

/// Histogram over [-90, 90] with equal-width bins.
///
/// Bin `i` covers `[-90 + i*w, -90 + (i+1)*w)`; the last bin also includes
/// +90. The layout depends only on the bin count, never on the data.
#[derive(Debug, Clone)]
pub struct AngleHistogram {
    counts: Vec<usize>,
    bin_width: f64,
}

impl AngleHistogram {
    pub fn new(bin_count: usize) -> Self {
        assert!(bin_count > 0, "angle histogram requires at least one bin");
        Self {
            counts: vec![0; bin_count],
            bin_width: (RANGE_MAX_DEG - RANGE_MIN_DEG) / bin_count as f64,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Left edge of bin `index`.
    pub fn bin_start(&self, index: usize) -> f64 {
        RANGE_MIN_DEG + index as f64 * self.bin_width
    }

    /// Midpoint of bin `index`.
    pub fn bin_center(&self, index: usize) -> f64 {
        (self.bin_start(index) + self.bin_start(index + 1)) * 0.5
    }

    /// Bin containing `angle`, or `None` for non-finite or out-of-range values.
    pub fn bin_index(&self, angle: f64) -> Option<usize> {
        if !angle.is_finite() || !(RANGE_MIN_DEG..=RANGE_MAX_DEG).contains(&angle) {
            return None;
        }
        let last = self.counts.len() - 1;
        let mut idx = (((angle - RANGE_MIN_DEG) / self.bin_width).floor() as usize).min(last);
        // Division can land one bin off near an edge; settle against the edges.
        if idx > 0 && angle < self.bin_start(idx) {
            idx -= 1;
        } else if idx < last && angle >= self.bin_start(idx + 1) {
            idx += 1;
        }
        Some(idx)
    }

    pub fn accumulate(&mut self, angle: f64) {
        if let Some(idx) = self.bin_index(angle) {
            self.counts[idx] += 1;
        }
    }

    /// Index of the fullest bin. Ties go to the lowest index. `None` when
    /// every bin is empty.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (idx, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((idx, count)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

/// Winning histogram bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantAngle {
    /// Midpoint of the winning bin, in degrees.
    pub degrees: f64,
    /// Number of angles in the winning bin.
    pub votes: usize,
    /// Index of the winning bin.
    pub bin: usize,
}

/// Picks the histogram mode of a set of normalized angles.
#[derive(Debug, Clone, Copy)]
pub struct DominantAngleEstimator {
    bin_count: usize,
}

impl Default for DominantAngleEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_BIN_COUNT)
    }
}

impl DominantAngleEstimator {
    pub fn new(bin_count: usize) -> Self {
        assert!(bin_count > 0, "dominant angle estimator requires at least one bin");
        Self { bin_count }
    }

    pub fn histogram(&self, angles: &[f64]) -> AngleHistogram {
        let mut hist = AngleHistogram::new(self.bin_count);
        for &angle in angles {
            hist.accumulate(angle);
        }
        hist
    }

    /// Midpoint of the most populated bin. Returns `None` if no angle falls
    /// inside the histogram range.
    pub fn estimate(&self, angles: &[f64]) -> Option<DominantAngle> {
        let hist = self.histogram(angles);
        let bin = hist.argmax()?;
        let dominant = DominantAngle {
            degrees: hist.bin_center(bin),
            votes: hist.counts()[bin],
            bin,
        };
        debug!(
            samples = angles.len(),
            bin,
            votes = dominant.votes,
            degrees = dominant.degrees,
            "Dominant angle selected"
        );
        Some(dominant)
    }
}
