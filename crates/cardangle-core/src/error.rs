// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for cardangle.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all cardangle operations.
#[derive(Debug, Error)]
pub enum CardAngleError {
    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("font could not be loaded: {0}")]
    Font(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("cannot read input {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CardAngleError>;
