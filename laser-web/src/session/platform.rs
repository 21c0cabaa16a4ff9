//! Platform capabilities the tracking session is driven by
//!
//! The browser implementation lives in `bridge`; tests use an in-memory fake.
//! Every handle type releases its resource on drop.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::camera::CameraBackend;
use crate::config::DetectorConfig;
use crate::error::PointerError;
use crate::renderer::DrawSurface;
use crate::tracking::HandLandmarks;

/// Per-frame callback, receives a high resolution timestamp in ms
pub type FrameCallback = Box<dyn FnMut(f64)>;

pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Hand landmark detector (one hand max). Dropping it releases the model.
pub trait HandDetector {
    /// Detect on the current video frame.
    ///
    /// `timestamp_ms` must be non-decreasing for the lifetime of the detector.
    fn detect(&mut self, timestamp_ms: f64) -> Result<Option<HandLandmarks>, PointerError>;
}

/// Readiness and intrinsic size of the current video frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoFrameInfo {
    /// At least HAVE_CURRENT_DATA
    pub has_current_data: bool,
    pub width: u32,
    pub height: u32,
}

/// What drives the per-frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSchedule {
    /// Once per decoded video frame (`requestVideoFrameCallback`)
    VideoFrame,
    /// Once per display refresh (`requestAnimationFrame`)
    AnimationFrame,
}

/// Everything the session needs from its host.
///
/// Frame pumps run the callback one frame at a time and only schedule the
/// next frame after the callback returns.
#[async_trait(?Send)]
pub trait Platform: CameraBackend + 'static {
    type Detector: HandDetector;
    type Surface: DrawSurface;
    /// Scheduled frame loop; dropping it cancels the pending callback
    type Pump;
    /// Resize listener; dropping it unsubscribes
    type Subscription;

    async fn load_detector(&self, config: &DetectorConfig) -> Result<Self::Detector, PointerError>;

    /// The render target, or `SurfaceUnavailable` if it is not in the page yet
    fn surface(&self) -> Result<Self::Surface, PointerError>;

    /// CSS size of the area the surface fills
    fn viewport_size(&self) -> (f64, f64);

    fn video_frame(&self) -> VideoFrameInfo;

    /// Best schedule the platform supports
    fn frame_schedule(&self) -> FrameSchedule;

    fn start_frame_pump(&self, schedule: FrameSchedule, tick: FrameCallback) -> Self::Pump;

    fn on_resize(&self, callback: Box<dyn FnMut()>) -> Self::Subscription;

    /// Run a task on the current (only) thread
    fn spawn_local(&self, task: LocalTask);
}
