// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch runner — estimate every supported image in a directory and write an
// annotated copy of each. A failure on one file never stops the others.

use std::path::{Path, PathBuf};

use cardangle_core::error::{CardAngleError, Result};
use cardangle_core::{AngleEstimate, BatchConfig, BatchReport, FileOutcome};
use tracing::{info, instrument, warn};

use crate::lines::EdgeLineDetector;
use crate::pipeline::AnglePipeline;
use crate::render::Visualizer;

/// Input extensions accepted by [`collect_inputs`] (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

/// Suffix appended to the input stem for annotated outputs.
pub const OUTPUT_SUFFIX: &str = "_angle";

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

/// Supported image files directly inside `dir`, sorted by path.
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CardAngleError::InputNotFound(dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir).map_err(|source| CardAngleError::InputUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(supported_files(
        entries.map(|entry| entry.map(|entry| entry.path())),
    ))
}

/// Sorted supported files from a directory listing. Unreadable entries are
/// skipped.
fn supported_files(entries: impl IntoIterator<Item = std::io::Result<PathBuf>>) -> Vec<PathBuf> {
    let mut inputs: Vec<PathBuf> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(error = %err, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    inputs.sort();
    inputs
}

/// `<output_dir>/<stem>_angle.<ext>`, reusing the input extension (lowercased)
/// unless `extension` overrides it.
pub fn output_path_for(input: &Path, output_dir: &Path, extension: Option<&str>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let ext = extension
        .map(str::to_string)
        .or_else(|| {
            input
                .extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase())
        })
        .unwrap_or_else(|| "png".to_string());
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.{ext}"))
}

/// Runs the full per-image pipeline over a directory (or a single file).
pub struct BatchRunner<D> {
    config: BatchConfig,
    pipeline: AnglePipeline<D>,
    visualizer: Visualizer,
}

impl<D: EdgeLineDetector> BatchRunner<D> {
    /// Validate `config` and build the pipeline and renderer.
    pub fn new(config: BatchConfig, detector: D) -> Result<Self> {
        config.validate()?;
        let visualizer = Visualizer::new(config.render.clone())?;
        Ok(Self::with_visualizer(config, detector, visualizer))
    }

    /// Build with a caller-supplied renderer. `config` must already be valid.
    pub fn with_visualizer(config: BatchConfig, detector: D, visualizer: Visualizer) -> Self {
        let pipeline = AnglePipeline::new(detector, &config.angle);
        Self {
            config,
            pipeline,
            visualizer,
        }
    }

    /// Process every supported image under `config.input_dir`, or the single
    /// file it names. Only an unreadable input location or an uncreatable
    /// output directory aborts the run.
    #[instrument(skip_all, fields(input = %self.config.input_dir.display(), output = %self.config.output_dir.display()))]
    pub fn run(&self) -> Result<BatchReport> {
        let input = &self.config.input_dir;
        let inputs = if input.is_file() {
            vec![input.clone()]
        } else {
            collect_inputs(input)?
        };
        std::fs::create_dir_all(&self.config.output_dir)?;
        info!(files = inputs.len(), "Starting batch");

        let mut report = BatchReport::default();
        for path in &inputs {
            report.push(self.process_file(path));
        }

        info!(
            processed = report.processed(),
            failed = report.failed(),
            without_detection = report.without_detection(),
            "Batch complete"
        );
        Ok(report)
    }

    /// Estimate, render and save one image. Errors become a failed outcome.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let output = output_path_for(
            path,
            &self.config.output_dir,
            self.config.output_extension.as_deref(),
        );
        match self.try_process(path, &output) {
            Ok(estimate) => {
                match estimate.angle {
                    Some(angle) => info!(angle, "Detected angle"),
                    None => info!(detected = estimate.segments_detected, "No valid angles found"),
                }
                FileOutcome::Processed {
                    input: path.to_path_buf(),
                    output,
                    estimate,
                }
            }
            Err(err) => {
                warn!(error = %err, "Skipping file");
                FileOutcome::Failed {
                    input: path.to_path_buf(),
                    reason: err.to_string(),
                }
            }
        }
    }

    fn try_process(&self, path: &Path, output: &Path) -> Result<AngleEstimate> {
        let (image, result) = self.pipeline.estimate_path(path)?;
        let annotated = self
            .visualizer
            .render(&image, &result.segments, result.estimate.angle);

        if let Err(err) = annotated.save(output) {
            // Leave nothing half-written behind.
            let _ = std::fs::remove_file(output);
            return Err(CardAngleError::ImageError(format!(
                "failed to save {}: {}",
                output.display(),
                err
            )));
        }
        Ok(result.estimate)
    }
}
