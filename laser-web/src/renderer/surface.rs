//! 2D draw target - the single overlay surface the pointer renders into

use nalgebra::Point2;

use crate::geometry::{FitRect, ViewportGeometry};

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
}

/// Immediate-mode 2D surface (Canvas 2D in the browser).
///
/// Lines use round caps. Coordinates are surface pixels after any active
/// transform.
pub trait DrawSurface {
    /// Apply a new geometry: internal size, CSS size, identity transform,
    /// image smoothing off.
    fn resize(&mut self, viewport: &ViewportGeometry);

    fn clear(&mut self, width: f64, height: f64);

    fn save(&mut self);

    fn restore(&mut self);

    /// Flip horizontally around the vertical center line
    fn mirror_horizontally(&mut self, width: f64);

    /// Blit the current camera frame into `fit`
    fn draw_video(&mut self, fit: &FitRect);

    fn stroke_line(&mut self, from: Point2<f64>, to: Point2<f64>, stroke: &Stroke);

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: &str);

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, stroke: &Stroke);
}
