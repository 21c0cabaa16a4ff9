//! Tracking module - hand landmark schema, EMA smoothing, pointer projection
//!
//! Re-exports only. All logic in submodules.

mod landmarks;
mod projection;
mod smoothing;

pub use landmarks::{
    HandLandmark, HandLandmarks,
    HAND_CONNECTIONS, HAND_LANDMARK_COUNT, LANDMARK_STRIDE,
    WRIST, INDEX_MCP, INDEX_TIP,
};
pub use projection::{normalize_or_zero, project_pointer, PointerProjection};
pub use smoothing::{ema, EmaFilter2D, PointerSmoothing, SmoothingState};
