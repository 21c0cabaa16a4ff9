//! Geometry module - viewport sizing and video aspect fitting
//!
//! Re-exports only. All logic in submodules.

mod fit;
mod viewport;

pub use fit::{compute_fit_rect, FitMode, FitRect};
pub use viewport::{compute_viewport_geometry, ViewportBudget, ViewportGeometry};
