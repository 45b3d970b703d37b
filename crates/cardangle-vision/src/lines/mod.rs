// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lines module — the edge/line detection capability consumed by the angle
// estimator, plus the default Canny + Hough implementation.

pub mod detector;
pub mod trace;

pub use detector::{EdgeLineDetector, HoughSegmentDetector};
