// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cardangle-vision — Rotation estimation for photographed cards.
//
// Provides line-segment detection (Canny + Hough), orientation filtering and
// normalization, histogram-mode dominant angle selection, annotated
// rendering, and a directory batch runner.

pub mod angle;
pub mod batch;
pub mod lines;
pub mod pipeline;
pub mod render;

// Re-export the primary structs so callers can use `cardangle_vision::AnglePipeline` etc.
pub use angle::{AngleNormalizer, DominantAngleEstimator};
pub use batch::BatchRunner;
pub use lines::{EdgeLineDetector, HoughSegmentDetector};
pub use pipeline::{AnglePipeline, PipelineOutput};
pub use render::Visualizer;
