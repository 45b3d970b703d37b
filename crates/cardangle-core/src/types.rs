// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the cardangle estimator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate. Y grows downward (raster convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A straight segment reported by an edge/line detector.
///
/// Segments are undirected for orientation purposes: swapping `start` and
/// `end` never changes the raw angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    /// The same segment with its endpoints swapped.
    pub const fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// `(dx, dy)` from `start` to `end`.
    pub fn delta(&self) -> (f64, f64) {
        (
            f64::from(self.end.x) - f64::from(self.start.x),
            f64::from(self.end.y) - f64::from(self.start.y),
        )
    }

    /// Euclidean length in pixels.
    pub fn length(&self) -> f64 {
        let (dx, dy) = self.delta();
        dx.hypot(dy)
    }

    /// Orientation of the undirected segment in degrees, reduced to [0, 180).
    pub fn raw_angle(&self) -> f64 {
        let (dx, dy) = self.delta();
        let reduced = dy.atan2(dx).to_degrees().rem_euclid(180.0);
        // rem_euclid can round tiny negatives up to exactly 180.
        if reduced >= 180.0 { 0.0 } else { reduced }
    }
}

/// Result of estimating one image's rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleEstimate {
    /// Dominant normalized angle in degrees, or `None` when no segment
    /// survived the noise filter.
    pub angle: Option<f64>,
    /// Segments returned by the detector, before filtering.
    pub segments_detected: usize,
    /// Segments that passed the noise filter.
    pub segments_accepted: usize,
    /// Members of the winning histogram bin.
    pub dominant_votes: usize,
}

impl AngleEstimate {
    /// An estimate carrying no angle.
    pub const fn no_detection(segments_detected: usize) -> Self {
        Self {
            angle: None,
            segments_detected,
            segments_accepted: 0,
            dominant_votes: 0,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.angle.is_some()
    }

    /// Angle with the legacy zero sentinel substituted for "no detection".
    pub fn sentinel_angle(&self) -> f64 {
        self.angle.unwrap_or(0.0)
    }
}

/// Outcome of processing a single input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Processed {
        input: PathBuf,
        output: PathBuf,
        estimate: AngleEstimate,
    },
    Failed {
        input: PathBuf,
        reason: String,
    },
}

impl FileOutcome {
    pub fn input(&self) -> &PathBuf {
        match self {
            Self::Processed { input, .. } | Self::Failed { input, .. } => input,
        }
    }

    /// The estimate, if the file was processed.
    pub fn estimate(&self) -> Option<&AngleEstimate> {
        match self {
            Self::Processed { estimate, .. } => Some(estimate),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-file outcomes of a batch run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Files that produced an output image (with or without an angle).
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Processed files for which no angle could be estimated.
    pub fn without_detection(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(FileOutcome::estimate)
            .filter(|e| !e.is_detected())
            .count()
    }
}
