// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Angle module — segment orientation filtering/normalization and
// histogram-mode dominant angle estimation.

pub mod histogram;
pub mod normalize;

pub use histogram::{AngleHistogram, DominantAngle, DominantAngleEstimator};
pub use normalize::{AngleNormalizer, NoiseFilter};
