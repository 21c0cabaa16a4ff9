//! Knuckle -> tip -> ray projection
//!
//! Landmarks are mapped to surface pixels through the video FitRect, the two
//! endpoints are smoothed, and the ray direction is smoothed separately and
//! renormalized before being extended past the viewport edge.

use nalgebra::{Point2, Vector2};

use super::landmarks::HandLandmarks;
use super::smoothing::PointerSmoothing;
use crate::geometry::{FitRect, ViewportGeometry};

/// Per-frame pointer geometry in un-mirrored surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerProjection {
    pub knuckle: Point2<f64>,
    pub tip: Point2<f64>,
    /// Unit vector, or zero when knuckle and tip coincide
    pub direction: Vector2<f64>,
    pub ray_end: Point2<f64>,
    pub ray_length: f64,
}

/// Unit vector, or zero for a degenerate input
pub fn normalize_or_zero(v: Vector2<f64>) -> Vector2<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector2::zeros)
}

/// Project the pointer for one frame, advancing the smoothing state.
pub fn project_pointer(
    hand: &HandLandmarks,
    fit: &FitRect,
    viewport: &ViewportGeometry,
    smoothing: &mut PointerSmoothing,
    ray_length_factor: f64,
) -> PointerProjection {
    let knuckle_raw = hand.index_knuckle();
    let tip_raw = hand.index_tip();

    let knuckle = smoothing
        .knuckle
        .filter(fit.to_pixel(knuckle_raw.x, knuckle_raw.y).coords);
    let tip = smoothing.tip.filter(fit.to_pixel(tip_raw.x, tip_raw.y).coords);

    // EMA on a unit vector shrinks it, so renormalize after smoothing
    let raw_direction = normalize_or_zero(tip - knuckle);
    let direction = normalize_or_zero(smoothing.direction.filter(raw_direction));

    let ray_length = viewport.diagonal() * ray_length_factor;
    let knuckle = Point2::from(knuckle);

    PointerProjection {
        knuckle,
        tip: Point2::from(tip),
        direction,
        ray_end: knuckle + direction * ray_length,
        ray_length,
    }
}
