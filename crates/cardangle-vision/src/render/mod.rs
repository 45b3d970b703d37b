// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render module — annotated output images (segments, angle ray, label).

pub mod visualize;

pub use visualize::Visualizer;
