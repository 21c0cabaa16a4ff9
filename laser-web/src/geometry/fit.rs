//! Aspect fitting of the source video into the render surface

use nalgebra::Point2;
use serde::Deserialize;

/// How the source frame is scaled into the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Fill the destination, crop overflow
    #[default]
    Cover,
    /// Fit inside the destination, letterbox
    Contain,
}

/// Placement of the source frame in surface pixels (already rounded)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl FitRect {
    /// Map a normalized (0-1) source coordinate into surface pixels
    pub fn to_pixel(&self, x: f32, y: f32) -> Point2<f64> {
        Point2::new(
            self.offset_x + x as f64 * self.width,
            self.offset_y + y as f64 * self.height,
        )
    }
}

/// Centered fit of a `src` frame into a `dst` surface.
///
/// Returns `None` when either size is degenerate; the caller skips the frame.
pub fn compute_fit_rect(
    src_width: f64,
    src_height: f64,
    dst_width: f64,
    dst_height: f64,
    mode: FitMode,
) -> Option<FitRect> {
    if ![src_width, src_height, dst_width, dst_height]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    {
        return None;
    }

    let sx = dst_width / src_width;
    let sy = dst_height / src_height;
    let scale = match mode {
        FitMode::Cover => sx.max(sy),
        FitMode::Contain => sx.min(sy),
    };

    let width = (src_width * scale).round();
    let height = (src_height * scale).round();

    Some(FitRect {
        offset_x: ((dst_width - width) / 2.0).round(),
        offset_y: ((dst_height - height) / 2.0).round(),
        width,
        height,
    })
}
