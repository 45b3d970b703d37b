// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface: arguments, config merging, and exit codes.

use std::path::PathBuf;

use cardangle_core::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use cardangle_core::{BatchConfig, CardAngleError};
use clap::Parser;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every file processed.
    Success = 0,
    /// Configuration or arguments were rejected.
    InvalidArgs = 2,
    /// Input directory, file, or config file does not exist or cannot be read.
    InputNotFound = 3,
    /// Output could not be written (directory creation, report file).
    OutputError = 4,
    /// At least one image failed; the rest were processed.
    ProcessingError = 5,
}

impl ExitCode {
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::InvalidArgs => "Invalid arguments or configuration",
            ExitCode::InputNotFound => "Input not found",
            ExitCode::OutputError => "Output error",
            ExitCode::ProcessingError => "One or more images could not be processed",
        }
    }

    /// Map a fatal error to the exit code reported for it.
    pub fn for_error(err: &CardAngleError) -> Self {
        match err {
            CardAngleError::InputNotFound(_) | CardAngleError::InputUnreadable { .. } => {
                ExitCode::InputNotFound
            }
            CardAngleError::InvalidConfig(_)
            | CardAngleError::Font(_)
            | CardAngleError::Serialization(_) => ExitCode::InvalidArgs,
            CardAngleError::Io(_) | CardAngleError::ImageError(_) => ExitCode::OutputError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Estimate the rotation of photographed cards from their straight edges
#[derive(Parser, Debug)]
#[command(name = "cardangle")]
#[command(version)]
#[command(about = "Estimate the rotation of photographed cards from their straight edges", long_about = None)]
pub struct Cli {
    /// Input image directory, or a single image file
    #[arg(default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,

    /// Output directory for annotated images (created if missing)
    #[arg(default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Raw angles at or below this many degrees are ignored
    #[arg(long)]
    pub noise_min: Option<f64>,

    /// Raw angles at or above this many degrees are ignored
    #[arg(long)]
    pub noise_max: Option<f64>,

    /// Number of histogram bins over [-90, 90]
    #[arg(long)]
    pub bins: Option<usize>,

    /// TrueType font used for the angle label
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Write annotated images with this extension instead of the input's
    #[arg(long = "output-ext")]
    pub output_ext: Option<String>,

    /// Write a JSON report of every file's outcome
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Defaults, then the config file, then explicit flags.
    pub fn batch_config(&self) -> Result<BatchConfig, CardAngleError> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::load(path)?,
            None => BatchConfig::default(),
        };

        config.input_dir = self.input.clone();
        config.output_dir = self.output.clone();
        if let Some(min) = self.noise_min {
            config.angle.noise_min_deg = min;
        }
        if let Some(max) = self.noise_max {
            config.angle.noise_max_deg = max;
        }
        if let Some(bins) = self.bins {
            config.angle.bin_count = bins;
        }
        if let Some(font) = &self.font {
            config.render.font_path = Some(font.clone());
        }
        if let Some(ext) = &self.output_ext {
            config.output_extension = Some(ext.trim_start_matches('.').to_ascii_lowercase());
        }

        config.validate()?;
        Ok(config)
    }
}
