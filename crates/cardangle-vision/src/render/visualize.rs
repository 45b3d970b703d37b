// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Draws detected segments and the estimated rotation onto a copy of the input.

use std::path::Path;

use ab_glyph::FontVec;
use cardangle_core::error::CardAngleError;
use cardangle_core::{LineSegment, RenderConfig};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use tracing::{debug, info};

/// Fonts tried when no explicit font path is configured.
const SYSTEM_FONT_PATHS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Renders the annotated output image.
///
/// Every detected segment is drawn in `segment_color`. When an angle is
/// available a ray is drawn from the image centre, half the shorter image
/// side long, in `ray_color`; the label is drawn only if a font is loaded.
pub struct Visualizer {
    config: RenderConfig,
    font: Option<FontVec>,
}

impl Visualizer {
    /// Build a visualizer, loading the label font.
    ///
    /// An explicit `font_path` must load; otherwise the common system font
    /// locations are tried and text is skipped if none is found.
    pub fn new(config: RenderConfig) -> Result<Self, CardAngleError> {
        let font = match &config.font_path {
            Some(path) => Some(load_font(path)?),
            None => system_font(),
        };
        Ok(Self { config, font })
    }

    /// Build a visualizer that never draws text.
    pub fn without_font(config: RenderConfig) -> Self {
        Self { config, font: None }
    }

    /// Annotate `image` with `segments` and the optional dominant `angle`
    /// (degrees, counter-clockwise from horizontal as seen on screen).
    pub fn render(&self, image: &DynamicImage, segments: &[LineSegment], angle: Option<f64>) -> RgbImage {
        let mut canvas = image.to_rgb8();
        let segment_color = Rgb(self.config.segment_color);
        let ray_color = Rgb(self.config.ray_color);

        for seg in segments {
            draw_line_segment_mut(
                &mut canvas,
                (seg.start.x as f32, seg.start.y as f32),
                (seg.end.x as f32, seg.end.y as f32),
                segment_color,
            );
        }

        if let Some(degrees) = angle {
            let (start, end) = ray_endpoints(canvas.width(), canvas.height(), degrees);
            draw_thick_line(&mut canvas, start, end, self.config.ray_thickness, ray_color);
        }

        if let Some(font) = &self.font {
            draw_text_mut(
                &mut canvas,
                ray_color,
                10,
                10,
                self.config.font_scale,
                font,
                &label(angle),
            );
        }

        canvas
    }
}

/// Label text for the annotated image.
pub fn label(angle: Option<f64>) -> String {
    match angle {
        Some(degrees) => format!("Angle: {degrees:.1}°"),
        None => "Angle: none".to_string(),
    }
}

/// Centre and far end of the angle ray.
///
/// The ray has length `min(w, h) / 2`; the vertical component is negated
/// because raster Y grows downward.
pub fn ray_endpoints(width: u32, height: u32, degrees: f64) -> ((f32, f32), (f32, f32)) {
    let (cx, cy) = (f64::from(width / 2), f64::from(height / 2));
    let length = f64::from(width.min(height) / 2);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let end_x = (cx + length * cos).trunc();
    let end_y = (cy - length * sin).trunc();
    ((cx as f32, cy as f32), (end_x as f32, end_y as f32))
}

/// Draw `thickness` parallel one-pixel lines centred on the segment.
fn draw_thick_line(canvas: &mut RgbImage, start: (f32, f32), end: (f32, f32), thickness: u32, color: Rgb<u8>) {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let len = dx.hypot(dy);
    if len < f32::EPSILON || thickness <= 1 {
        draw_line_segment_mut(canvas, start, end, color);
        return;
    }
    let (nx, ny) = (-dy / len, dx / len);
    let half = (thickness as f32 - 1.0) / 2.0;
    for i in 0..thickness {
        let offset = i as f32 - half;
        draw_line_segment_mut(
            canvas,
            (start.0 + nx * offset, start.1 + ny * offset),
            (end.0 + nx * offset, end.1 + ny * offset),
            color,
        );
    }
}

fn load_font(path: &Path) -> Result<FontVec, CardAngleError> {
    let data = std::fs::read(path)
        .map_err(|err| CardAngleError::Font(format!("failed to read {}: {}", path.display(), err)))?;
    let font = FontVec::try_from_vec(data)
        .map_err(|_| CardAngleError::Font(format!("failed to parse font file {}", path.display())))?;
    info!(path = %path.display(), "Loaded label font");
    Ok(font)
}

fn system_font() -> Option<FontVec> {
    for path in SYSTEM_FONT_PATHS {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(data) {
                info!(path, "Loaded system font");
                return Some(font);
            }
        }
    }
    debug!("No system font found, angle label will be skipped");
    None
}
