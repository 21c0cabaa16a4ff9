//! Camera module - device discovery, back-lens ranking, constraint fallback
//!
//! Re-exports only. All logic in submodules.

mod acquire;
mod constraints;
mod device;

pub use acquire::{acquire_stream, list_cameras, CameraBackend, CameraStream};
pub use constraints::{build_attempts, CaptureConstraints, FacingConstraint};
pub use device::{
    is_back, rank_back_cameras, score_back,
    CameraDevice, DeviceKind, FacingMode, LensKind,
};
