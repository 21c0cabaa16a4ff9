//! Pointer rendering - video background, hand skeleton, smoothed laser ray

use super::surface::{DrawSurface, Stroke};
use crate::config::RenderConfig;
use crate::geometry::{FitRect, ViewportGeometry};
use crate::tracking::{
    project_pointer, HandLandmarks, PointerProjection, PointerSmoothing, HAND_CONNECTIONS,
};

/// Styles for the overlay elements
mod style {
    use super::Stroke;

    /// Skeleton bones
    pub const SKELETON: Stroke = Stroke { color: "rgba(0, 200, 255, 0.95)", width: 3.0 };
    /// Raw detector keypoints
    pub const LANDMARK: &str = "rgba(255, 0, 0, 0.9)";
    pub const LANDMARK_RADIUS: f64 = 3.0;
    /// Smoothed knuckle -> tip segment
    pub const SEGMENT: Stroke = Stroke { color: "rgba(0, 255, 255, 0.95)", width: 4.0 };
    pub const TIP: &str = "cyan";
    pub const TIP_RADIUS: f64 = 6.0;
    pub const KNUCKLE: &str = "rgba(0, 255, 255, 0.7)";
    pub const KNUCKLE_RADIUS: f64 = 5.0;
    /// The long ray
    pub const LASER: Stroke = Stroke { color: "rgba(0, 255, 255, 0.9)", width: 3.0 };
    pub const LASER_END: Stroke = Stroke { color: "rgba(0, 255, 255, 0.9)", width: 2.0 };
    pub const LASER_END_RADIUS: f64 = 8.0;
}

/// Where this frame goes on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    pub viewport: ViewportGeometry,
    pub fit: FitRect,
    /// Front camera: flip the whole frame so it reads like a mirror
    pub mirror: bool,
}

fn draw_skeleton<S: DrawSurface>(surface: &mut S, hand: &HandLandmarks, fit: &FitRect) {
    for (start_idx, end_idx) in HAND_CONNECTIONS.iter() {
        let a = hand.points[*start_idx];
        let b = hand.points[*end_idx];
        surface.stroke_line(fit.to_pixel(a.x, a.y), fit.to_pixel(b.x, b.y), &style::SKELETON);
    }
}

fn draw_landmarks<S: DrawSurface>(surface: &mut S, hand: &HandLandmarks, fit: &FitRect) {
    for lm in hand.points.iter() {
        surface.fill_circle(fit.to_pixel(lm.x, lm.y), style::LANDMARK_RADIUS, style::LANDMARK);
    }
}

fn draw_pointer<S: DrawSurface>(surface: &mut S, pointer: &PointerProjection) {
    surface.stroke_line(pointer.knuckle, pointer.tip, &style::SEGMENT);
    surface.fill_circle(pointer.tip, style::TIP_RADIUS, style::TIP);
    surface.fill_circle(pointer.knuckle, style::KNUCKLE_RADIUS, style::KNUCKLE);

    surface.stroke_line(pointer.knuckle, pointer.ray_end, &style::LASER);
    surface.stroke_circle(pointer.ray_end, style::LASER_END_RADIUS, &style::LASER_END);
}

/// Render one frame.
///
/// The background is always drawn. Hand overlays and the smoothing update
/// only happen when a hand was detected; without one the smoothing state is
/// left alone so a returning hand picks up where it left off.
pub fn draw_frame<S: DrawSurface>(
    surface: &mut S,
    layout: &FrameLayout,
    hand: Option<&HandLandmarks>,
    smoothing: &mut PointerSmoothing,
    config: &RenderConfig,
) -> Option<PointerProjection> {
    let width = layout.viewport.width();
    let height = layout.viewport.height();

    surface.clear(width, height);
    surface.save();
    if layout.mirror {
        // everything below is in un-mirrored coordinates
        surface.mirror_horizontally(width);
    }

    surface.draw_video(&layout.fit);

    let mut pointer = None;
    if let Some(hand) = hand {
        draw_skeleton(surface, hand, &layout.fit);
        draw_landmarks(surface, hand, &layout.fit);

        let projection = project_pointer(
            hand,
            &layout.fit,
            &layout.viewport,
            smoothing,
            config.ray_length_factor,
        );
        draw_pointer(surface, &projection);
        pointer = Some(projection);
    }

    surface.restore();
    pointer
}
