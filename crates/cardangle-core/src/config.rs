// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Estimator configuration. Every field has a default matching the reference
// behaviour; a JSON file or CLI flags can override any of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CardAngleError, Result};

/// Raw angles at or below this bound are treated as near-horizontal noise.
pub const DEFAULT_NOISE_MIN_DEG: f64 = 10.0;
/// Raw angles at or above this bound are treated as near-horizontal noise.
pub const DEFAULT_NOISE_MAX_DEG: f64 = 170.0;
/// Number of histogram bins over the normalized range (1° per bin).
pub const DEFAULT_BIN_COUNT: usize = 180;

/// Upper bound on `bin_count` (a thousandth of a degree per bin).
pub const MAX_BIN_COUNT: usize = 180 * 1000;

pub const DEFAULT_INPUT_DIR: &str = "images_new";
pub const DEFAULT_OUTPUT_DIR: &str = "output_detected_angles";

/// Angle filtering and histogram settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleConfig {
    /// Exclusive lower bound on accepted raw angles, in degrees.
    pub noise_min_deg: f64,
    /// Exclusive upper bound on accepted raw angles, in degrees.
    pub noise_max_deg: f64,
    /// Number of equal-width bins covering [-90, 90].
    pub bin_count: usize,
}

impl Default for AngleConfig {
    fn default() -> Self {
        Self {
            noise_min_deg: DEFAULT_NOISE_MIN_DEG,
            noise_max_deg: DEFAULT_NOISE_MAX_DEG,
            bin_count: DEFAULT_BIN_COUNT,
        }
    }
}

impl AngleConfig {
    /// Check bounds and bin count.
    pub fn validate(&self) -> Result<()> {
        if self.bin_count == 0 {
            return Err(CardAngleError::InvalidConfig(
                "bin_count must be at least 1".into(),
            ));
        }
        if self.bin_count > MAX_BIN_COUNT {
            return Err(CardAngleError::InvalidConfig(format!(
                "bin_count must be at most {MAX_BIN_COUNT}, got {}",
                self.bin_count
            )));
        }
        if !self.noise_min_deg.is_finite() || !self.noise_max_deg.is_finite() {
            return Err(CardAngleError::InvalidConfig(
                "noise filter bounds must be finite".into(),
            ));
        }
        if self.noise_min_deg < 0.0
            || self.noise_max_deg > 180.0
            || self.noise_min_deg >= self.noise_max_deg
        {
            return Err(CardAngleError::InvalidConfig(format!(
                "noise filter bounds must satisfy 0 <= min < max <= 180 (got {} and {})",
                self.noise_min_deg, self.noise_max_deg
            )));
        }
        Ok(())
    }
}

/// Parameters for the Canny + Hough segment detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Gaussian blur sigma applied before edge detection (~5x5 kernel).
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Minimum accumulator votes for a Hough line.
    pub vote_threshold: u32,
    /// Non-maximum suppression radius in the Hough accumulator.
    pub suppression_radius: u32,
    /// Shortest run of edge pixels reported as a segment, in pixels.
    pub min_line_length: f32,
    /// Longest gap bridged inside one segment, in pixels.
    pub max_line_gap: f32,
    /// Distance from the traced line within which an edge pixel counts as a hit.
    pub trace_tolerance: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            vote_threshold: 80,
            suppression_radius: 2,
            min_line_length: 50.0,
            max_line_gap: 10.0,
            trace_tolerance: 1,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.blur_sigma.is_nan() || self.blur_sigma <= 0.0 {
            return Err(CardAngleError::InvalidConfig(
                "blur_sigma must be positive".into(),
            ));
        }
        if self.canny_low > self.canny_high {
            return Err(CardAngleError::InvalidConfig(format!(
                "canny_low ({}) must not exceed canny_high ({})",
                self.canny_low, self.canny_high
            )));
        }
        if self.min_line_length < 0.0 || self.max_line_gap < 0.0 {
            return Err(CardAngleError::InvalidConfig(
                "segment length and gap must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Appearance of the annotated output image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// RGB colour of every detected segment.
    pub segment_color: [u8; 3],
    /// RGB colour of the dominant-angle ray and its label.
    pub ray_color: [u8; 3],
    /// Ray thickness in pixels.
    pub ray_thickness: u32,
    /// Label font size in pixels.
    pub font_scale: f32,
    /// TrueType font for the label. Falls back to common system fonts.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            segment_color: [0, 255, 0],
            ray_color: [255, 0, 0],
            ray_thickness: 2,
            font_scale: 24.0,
            font_path: None,
        }
    }
}

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory of input images (or a single image file).
    pub input_dir: PathBuf,
    /// Directory receiving `<stem>_angle.<ext>` files. Created if missing.
    pub output_dir: PathBuf,
    /// Force an output format extension instead of reusing the input's.
    pub output_extension: Option<String>,
    pub angle: AngleConfig,
    pub detector: DetectorConfig,
    pub render: RenderConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_extension: None,
            angle: AngleConfig::default(),
            detector: DetectorConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CardAngleError::InputNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.angle.validate()?;
        self.detector.validate()?;
        if let Some(ext) = &self.output_extension {
            if ext.is_empty() || ext.contains(['/', '\\', '.']) {
                return Err(CardAngleError::InvalidConfig(format!(
                    "output_extension must be a bare extension such as \"png\" (got {ext:?})"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_constants() {
        let config = BatchConfig::default();
        assert_eq!(config.angle.noise_min_deg, 10.0);
        assert_eq!(config.angle.noise_max_deg, 170.0);
        assert_eq!(config.angle.bin_count, 180);
        assert_eq!(config.input_dir, PathBuf::from("images_new"));
        assert_eq!(config.output_dir, PathBuf::from("output_detected_angles"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_bin_count_rejected() {
        let at_limit = AngleConfig {
            bin_count: MAX_BIN_COUNT,
            ..AngleConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let huge = AngleConfig {
            bin_count: usize::MAX,
            ..AngleConfig::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(CardAngleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_bins_rejected() {
        let angle = AngleConfig {
            bin_count: 0,
            ..AngleConfig::default()
        };
        assert!(matches!(
            angle.validate(),
            Err(CardAngleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_noise_bounds_rejected() {
        let angle = AngleConfig {
            noise_min_deg: 120.0,
            noise_max_deg: 60.0,
            ..AngleConfig::default()
        };
        assert!(angle.validate().is_err());

        let angle = AngleConfig {
            noise_min_deg: f64::NAN,
            ..AngleConfig::default()
        };
        assert!(angle.validate().is_err());
    }

    #[test]
    fn dotted_output_extension_rejected() {
        let config = BatchConfig {
            output_extension: Some(".png".into()),
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_partial_json_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "output_dir": "out", "angle": {{ "bin_count": 360 }} }}"#
        )
        .unwrap();

        let config = BatchConfig::load(file.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.angle.bin_count, 360);
        assert_eq!(config.angle.noise_min_deg, DEFAULT_NOISE_MIN_DEG);
        assert_eq!(config.detector, DetectorConfig::default());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = BatchConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CardAngleError::InputNotFound(_)));
    }

    #[test]
    fn load_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "angle": {{ "bin_count": 0 }} }}"#).unwrap();
        assert!(matches!(
            BatchConfig::load(file.path()),
            Err(CardAngleError::InvalidConfig(_))
        ));
    }
}
