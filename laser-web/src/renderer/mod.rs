//! Renderer module - 2D overlay drawing for the pointer
//!
//! Re-exports only. All logic in submodules.

mod pointer;
mod surface;

pub use pointer::{draw_frame, FrameLayout};
pub use surface::{DrawSurface, Stroke};

#[cfg(test)]
pub(crate) use surface::recording;
