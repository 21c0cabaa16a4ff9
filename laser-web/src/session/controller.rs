//! Tracking session - owns the detector, camera stream, surface and frame loop
//!
//! All state lives behind one `Rc<RefCell<..>>`; platform callbacks hold weak
//! handles so dropping the last `TrackingSession` tears everything down.
//!
//! Each start runs under an abort handle. A newer start or a stop aborts it,
//! which drops the start at its current suspension point together with any
//! stream it was negotiating. The generation counter tags the callbacks a
//! start installs so stale ones are ignored.
//!
//! The detector load runs as its own task: restarts wait on the same load
//! and a stop does not cancel it; a detector that arrives after a stop is
//! released on arrival.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::channel::oneshot;
use futures::future::{AbortHandle, AbortRegistration, Abortable, Shared as SharedFuture};
use futures::FutureExt;
use tracing::{debug, error, info, trace, warn};

use super::platform::{FrameCallback, HandDetector, Platform};
use crate::camera::{
    acquire_stream, list_cameras, CameraDevice, CameraStream, DeviceKind, FacingMode,
};
use crate::config::PointerConfig;
use crate::error::PointerError;
use crate::geometry::{compute_fit_rect, compute_viewport_geometry, ViewportGeometry};
use crate::renderer::{draw_frame, DrawSurface, FrameLayout};
use crate::tracking::{PointerProjection, PointerSmoothing};

/// Lifecycle of a tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Running,
    Stopping,
    Stopped,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Initializing => "initializing",
            SessionState::Running => "running",
            SessionState::Stopping => "stopping",
            SessionState::Stopped => "stopped",
        }
    }
}

// ============================================================================
// STATE
// ============================================================================

/// Resources of one running capture. Fields drop in declaration order: the
/// loop stops before the stream does.
struct ActiveCapture<P: Platform> {
    pump: Option<P::Pump>,
    resize: Option<P::Subscription>,
    surface: P::Surface,
    stream: P::Stream,
}

/// Completion of the in-flight detector load, shared by every waiting start
type DetectorLoad = SharedFuture<oneshot::Receiver<Result<(), PointerError>>>;

struct SessionInner<P: Platform> {
    state: SessionState,
    generation: u64,
    facing: FacingMode,
    device_id: Option<String>,
    devices: Vec<CameraDevice>,
    smoothing: PointerSmoothing,
    viewport: Option<ViewportGeometry>,
    /// Last timestamp handed to the current detector
    last_timestamp_ms: f64,
    last_error: Option<PointerError>,
    /// Survives restarts, released on stop
    detector: Option<P::Detector>,
    detector_load: Option<DetectorLoad>,
    /// Aborts the start in flight
    pending_start: Option<AbortHandle>,
    active: Option<ActiveCapture<P>>,
}

struct Shared<P: Platform> {
    platform: P,
    config: PointerConfig,
    inner: RefCell<SessionInner<P>>,
}

/// Handle to a tracking session. Clones share the same session.
pub struct TrackingSession<P: Platform> {
    shared: Rc<Shared<P>>,
}

impl<P: Platform> Clone for TrackingSession<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<P: Platform> TrackingSession<P> {
    pub fn new(platform: P, config: PointerConfig) -> Self {
        let inner = SessionInner {
            state: SessionState::Uninitialized,
            generation: 0,
            facing: config.default_facing,
            device_id: None,
            devices: Vec::new(),
            smoothing: PointerSmoothing::new(&config.smoothing),
            viewport: None,
            last_timestamp_ms: 0.0,
            last_error: None,
            detector: None,
            detector_load: None,
            pending_start: None,
            active: None,
        };
        Self {
            shared: Rc::new(Shared {
                platform,
                config,
                inner: RefCell::new(inner),
            }),
        }
    }

    fn from_weak(weak: &Weak<Shared<P>>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn state(&self) -> SessionState {
        self.shared.inner.borrow().state
    }

    pub fn facing(&self) -> FacingMode {
        self.shared.inner.borrow().facing
    }

    pub fn device_id(&self) -> Option<String> {
        self.shared.inner.borrow().device_id.clone()
    }

    /// Video inputs seen at the last (re)initialization
    pub fn devices(&self) -> Vec<CameraDevice> {
        self.shared.inner.borrow().devices.clone()
    }

    /// Why the last start failed, cleared when a new one begins
    pub fn last_error(&self) -> Option<PointerError> {
        self.shared.inner.borrow().last_error.clone()
    }

    pub fn viewport(&self) -> Option<ViewportGeometry> {
        self.shared.inner.borrow().viewport
    }

    fn is_current(&self, generation: u64) -> bool {
        self.shared.inner.borrow().generation == generation
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// (Re)initialize: detector, cameras, stream, surface, frame loop.
    ///
    /// Aborts any start in flight. Returns `Ok` without doing anything
    /// further if this start is itself superseded or stopped part way.
    pub async fn start(&self) -> Result<(), PointerError> {
        let (generation, registration) = self.begin_start();
        let Ok(outcome) = Abortable::new(self.initialize(generation), registration).await else {
            debug!(generation, "start superseded");
            return Ok(());
        };
        match outcome {
            Ok(()) => Ok(()),
            Err(err) => {
                if self.is_current(generation) {
                    error!(error = %err, "❌ tracking session failed to start");
                    self.release(Some(err.clone()));
                }
                Err(err)
            }
        }
    }

    /// Stop the loop and release every resource. Safe from any state.
    pub fn stop(&self) {
        if self.state() == SessionState::Stopped {
            return;
        }
        self.release(None);
        info!("tracking session stopped");
    }

    fn begin_start(&self) -> (u64, AbortRegistration) {
        let (handle, registration) = AbortHandle::new_pair();
        let (generation, superseded, previous) = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.generation += 1;
            inner.state = SessionState::Initializing;
            inner.smoothing.reset();
            inner.viewport = None;
            inner.last_error = None;
            info!(
                generation = inner.generation,
                facing = inner.facing.as_str(),
                device = ?inner.device_id,
                "initializing tracking session"
            );
            (
                inner.generation,
                inner.pending_start.replace(handle),
                inner.active.take(),
            )
        };
        if let Some(superseded) = superseded {
            superseded.abort();
        }
        // old tracks stop before the new stream is requested
        drop(previous);
        (generation, registration)
    }

    /// Tear everything down and land in Stopped
    fn release(&self, failure: Option<PointerError>) {
        let (pending, active, detector) = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.generation += 1;
            inner.state = SessionState::Stopping;
            inner.viewport = None;
            inner.last_timestamp_ms = 0.0;
            if failure.is_some() {
                inner.last_error = failure;
            }
            (
                inner.pending_start.take(),
                inner.active.take(),
                inner.detector.take(),
            )
        };
        if let Some(pending) = pending {
            pending.abort();
        }
        drop(active);
        drop(detector);
        self.shared.inner.borrow_mut().state = SessionState::Stopped;
    }

    async fn initialize(&self, generation: u64) -> Result<(), PointerError> {
        let platform = &self.shared.platform;
        let config = &self.shared.config;

        self.detector_ready().await?;

        let devices = list_cameras(platform).await;
        let (facing, device_id) = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.devices = devices.clone();
            (inner.facing, inner.device_id.clone())
        };
        debug!(count = devices.len(), "video inputs enumerated");

        let mut stream = acquire_stream(
            platform,
            &devices,
            facing,
            device_id.as_deref(),
            &config.capture,
        )
        .await?;

        let weak = Rc::downgrade(&self.shared);
        stream.on_track_ended(Box::new(move || {
            if let Some(session) = Self::from_weak(&weak) {
                session.handle_track_ended(generation);
            }
        }));

        // labels are only populated once permission was granted
        match platform.enumerate_devices().await {
            Ok(all) => {
                let video: Vec<CameraDevice> = all
                    .into_iter()
                    .filter(|d| d.kind == DeviceKind::VideoInput)
                    .collect();
                if !video.is_empty() {
                    self.shared.inner.borrow_mut().devices = video;
                }
            }
            Err(err) => debug!(error = %err, "device refresh failed"),
        }

        let mut surface = platform.surface()?;
        let (css_width, css_height) = platform.viewport_size();
        let viewport = compute_viewport_geometry(css_width, css_height, &config.viewport);
        surface.resize(&viewport);

        {
            let mut inner = self.shared.inner.borrow_mut();
            inner.viewport = Some(viewport);
            inner.active = Some(ActiveCapture {
                pump: None,
                resize: None,
                surface,
                stream,
            });
            inner.state = SessionState::Running;
        }

        let resize = platform.on_resize(self.resize_callback());
        let schedule = platform.frame_schedule();
        let pump = platform.start_frame_pump(schedule, self.tick_callback());
        if let Some(active) = self.shared.inner.borrow_mut().active.as_mut() {
            active.resize = Some(resize);
            active.pump = Some(pump);
        }

        info!(
            width = viewport.internal_width,
            height = viewport.internal_height,
            ?schedule,
            "🎯 pointer tracking running"
        );
        Ok(())
    }

    /// Resolve once a detector is held, joining the load in flight or
    /// spawning one.
    async fn detector_ready(&self) -> Result<(), PointerError> {
        let (load, spawn) = {
            let mut inner = self.shared.inner.borrow_mut();
            if inner.detector.is_some() {
                return Ok(());
            }
            if let Some(load) = inner.detector_load.clone() {
                (load, None)
            } else {
                let (done, load) = oneshot::channel();
                let load = load.shared();
                inner.detector_load = Some(load.clone());
                (load, Some(done))
            }
        };

        if let Some(done) = spawn {
            let session = self.clone();
            self.shared
                .platform
                .spawn_local(Box::pin(async move { session.load_detector(done).await }));
        } else {
            debug!("joining detector load in flight");
        }

        match load.await {
            Ok(result) => result,
            Err(oneshot::Canceled) => Err(PointerError::DetectorLoadFailed(
                "detector load was dropped".into(),
            )),
        }
    }

    /// Load the detector and hand it to the session, or release it if the
    /// session stopped in the meantime.
    async fn load_detector(self, done: oneshot::Sender<Result<(), PointerError>>) {
        let result = self
            .shared
            .platform
            .load_detector(&self.shared.config.detector)
            .await;

        let (outcome, discarded) = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.detector_load = None;
            match result {
                Ok(detector)
                    if matches!(
                        inner.state,
                        SessionState::Initializing | SessionState::Running
                    ) =>
                {
                    inner.last_timestamp_ms = 0.0;
                    inner.detector = Some(detector);
                    (Ok(()), None)
                }
                Ok(detector) => (Ok(()), Some(detector)),
                Err(err) => (Err(err), None),
            }
        };

        match (&outcome, discarded) {
            (Ok(()), None) => info!("✅ hand detector ready"),
            (Ok(()), Some(detector)) => {
                debug!("releasing detector loaded after stop");
                drop(detector);
            }
            (Err(err), _) => debug!(error = %err, "detector load failed"),
        }
        // every start waiting on it may already be gone
        let _ = done.send(outcome);
    }

    // ========================================================================
    // FRAME LOOP
    // ========================================================================

    fn tick_callback(&self) -> FrameCallback {
        let weak = Rc::downgrade(&self.shared);
        Box::new(move |now_ms| {
            if let Some(session) = Self::from_weak(&weak) {
                session.tick(now_ms);
            }
        })
    }

    fn resize_callback(&self) -> Box<dyn FnMut()> {
        let weak = Rc::downgrade(&self.shared);
        Box::new(move || {
            if let Some(session) = Self::from_weak(&weak) {
                session.handle_resize();
            }
        })
    }

    /// One frame: detect, fit, draw. Returns the pointer if a hand was drawn.
    pub fn tick(&self, now_ms: f64) -> Option<PointerProjection> {
        let platform = &self.shared.platform;
        let config = &self.shared.config;

        let Ok(mut guard) = self.shared.inner.try_borrow_mut() else {
            return None;
        };
        let inner = &mut *guard;
        if inner.state != SessionState::Running {
            return None;
        }
        let (Some(active), Some(detector), Some(viewport)) =
            (inner.active.as_mut(), inner.detector.as_mut(), inner.viewport)
        else {
            return None;
        };

        let frame = platform.video_frame();
        if !frame.has_current_data {
            trace!("video has no current frame yet");
            return None;
        }

        let timestamp_ms = now_ms.max(inner.last_timestamp_ms);
        inner.last_timestamp_ms = timestamp_ms;

        let hand = match detector.detect(timestamp_ms) {
            Ok(hand) => hand,
            Err(err) => {
                debug!(error = %err, "detection failed, skipping frame");
                return None;
            }
        };

        let Some(fit) = compute_fit_rect(
            frame.width as f64,
            frame.height as f64,
            viewport.width(),
            viewport.height(),
            config.render.fit_mode,
        ) else {
            trace!(
                width = frame.width,
                height = frame.height,
                "video size unknown, skipping frame"
            );
            return None;
        };

        let facing = active.stream.resolved_facing().unwrap_or(inner.facing);
        let layout = FrameLayout {
            viewport,
            fit,
            mirror: facing.is_mirrored(),
        };

        draw_frame(
            &mut active.surface,
            &layout,
            hand.as_ref(),
            &mut inner.smoothing,
            &config.render,
        )
    }

    fn handle_resize(&self) {
        let (css_width, css_height) = self.shared.platform.viewport_size();
        let viewport =
            compute_viewport_geometry(css_width, css_height, &self.shared.config.viewport);

        let mut guard = self.shared.inner.borrow_mut();
        let inner = &mut *guard;
        if let Some(active) = inner.active.as_mut() {
            active.surface.resize(&viewport);
            inner.viewport = Some(viewport);
            debug!(
                width = viewport.internal_width,
                height = viewport.internal_height,
                "surface resized"
            );
        }
    }

    fn handle_track_ended(&self, generation: u64) {
        {
            let inner = self.shared.inner.borrow();
            if inner.generation != generation || inner.state != SessionState::Running {
                return;
            }
        }
        warn!("camera track ended, re-initializing");
        let session = self.clone();
        self.shared.platform.spawn_local(Box::pin(async move {
            // failure is logged and recorded by start()
            let _ = session.start().await;
        }));
    }

    // ========================================================================
    // CONTROLS
    // ========================================================================

    /// Switch front/back, forget the explicit device and restart
    pub async fn toggle_facing(&self) -> Result<(), PointerError> {
        {
            let mut inner = self.shared.inner.borrow_mut();
            inner.facing = inner.facing.toggled();
            inner.device_id = None;
            info!(facing = inner.facing.as_str(), "camera facing toggled");
        }
        self.start().await
    }

    /// Pick a specific device (or go back to the facing preference).
    /// Restarts only when the selection actually changed.
    pub async fn select_device(&self, device_id: Option<String>) -> Result<(), PointerError> {
        {
            let mut inner = self.shared.inner.borrow_mut();
            if inner.device_id == device_id {
                return Ok(());
            }
            info!(device = ?device_id, "camera device selected");
            inner.device_id = device_id;
        }
        self.start().await
    }
}
