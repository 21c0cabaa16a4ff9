//! Laser Web - hand-tracked virtual laser pointer
//!
//! The index finger's knuckle and tip define a ray that is smoothed and
//! extended past the screen edge, drawn over the live camera feed.
//!
//! Only module declarations and re-exports live here:
//! - `camera`, `geometry`, `tracking`, `renderer`: platform-free core
//! - `session`: lifecycle, generic over a `Platform`
//! - `bridge`: browser platform and `#[wasm_bindgen]` API (wasm32 only)

pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod session;
pub mod tracking;

#[cfg(target_arch = "wasm32")]
mod bridge;

#[cfg(target_arch = "wasm32")]
pub use bridge::{init_logging, LaserPointer, WebPlatform};

pub use config::PointerConfig;
pub use error::{CameraError, PointerError};
pub use session::{Platform, SessionState, TrackingSession};
