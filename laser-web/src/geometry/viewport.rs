//! Internal render resolution derived from the on-screen (CSS) size

use serde::Deserialize;

/// Upper bound on internal pixels (~720p keeps the 2D blits fast)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportBudget {
    pub max_width: f64,
    pub max_height: f64,
}

impl Default for ViewportBudget {
    fn default() -> Self {
        Self {
            max_width: 1280.0,
            max_height: 720.0,
        }
    }
}

/// Surface size: internal pixel resolution plus the CSS box it is shown in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub internal_width: u32,
    pub internal_height: u32,
    pub css_width: f64,
    pub css_height: f64,
}

impl ViewportGeometry {
    pub fn width(&self) -> f64 {
        self.internal_width as f64
    }

    pub fn height(&self) -> f64 {
        self.internal_height as f64
    }

    /// Diagonal in internal pixels
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }
}

/// Scale the CSS size down into the budget, never up.
///
/// scale = min(1, max_w / css_w, max_h / css_h). Each side is at least 1px.
pub fn compute_viewport_geometry(
    css_width: f64,
    css_height: f64,
    budget: &ViewportBudget,
) -> ViewportGeometry {
    let css_width = sanitize(css_width);
    let css_height = sanitize(css_height);

    let scale = 1.0_f64
        .min(budget.max_width / css_width)
        .min(budget.max_height / css_height);

    ViewportGeometry {
        internal_width: (css_width * scale).round().max(1.0) as u32,
        internal_height: (css_height * scale).round().max(1.0) as u32,
        css_width,
        css_height,
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
