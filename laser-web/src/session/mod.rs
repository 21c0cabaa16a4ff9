//! Session module - tracking lifecycle and the platform it runs on
//!
//! Re-exports only. All logic in submodules.

mod controller;
mod platform;


pub use controller::{SessionState, TrackingSession};
pub use platform::{
    FrameCallback, FrameSchedule, HandDetector, LocalTask, Platform, VideoFrameInfo,
};
