//! Browser platform - window, media devices, video element, canvas

use async_trait::async_trait;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlVideoElement, MediaDevices, Window};

use super::canvas::CanvasSurface;
use super::detector::WebHandDetector;
use super::media::{self, MediaCapture};
use super::pump::{supports_video_frame_callback, FramePump, ResizeSubscription};
use crate::camera::{CameraBackend, CameraDevice, CaptureConstraints};
use crate::config::{DetectorConfig, DomConfig};
use crate::error::{CameraError, PointerError};
use crate::session::{FrameCallback, FrameSchedule, LocalTask, Platform, VideoFrameInfo};

/// `HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

pub struct WebPlatform {
    window: Window,
    document: Document,
    video: HtmlVideoElement,
    canvas_id: String,
}

impl WebPlatform {
    /// Bind to the page. The video element is created off-DOM if `video_id`
    /// does not exist; the canvas is looked up at each start.
    pub fn new(dom: &DomConfig) -> Result<Self, PointerError> {
        let unavailable = |what: &str| PointerError::SurfaceUnavailable(what.to_string());

        let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
        let document = window.document().ok_or_else(|| unavailable("no document"))?;

        let video = match document.get_element_by_id(&dom.video_id) {
            Some(element) => element
                .dyn_into::<HtmlVideoElement>()
                .map_err(|_| unavailable("video id does not name a <video>"))?,
            None => document
                .create_element("video")
                .map_err(|e| PointerError::SurfaceUnavailable(format!("{e:?}")))?
                .dyn_into::<HtmlVideoElement>()
                .map_err(|_| unavailable("could not create a <video>"))?,
        };

        Ok(Self {
            window,
            document,
            video,
            canvas_id: dom.canvas_id.clone(),
        })
    }

    fn media_devices(&self) -> Result<MediaDevices, CameraError> {
        self.window
            .navigator()
            .media_devices()
            .map_err(|e| CameraError::from_js(&e))
    }
}

#[async_trait(?Send)]
impl CameraBackend for WebPlatform {
    type Stream = MediaCapture;

    async fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, CameraError> {
        media::enumerate(&self.media_devices()?).await
    }

    async fn open_stream(&self, constraints: &CaptureConstraints) -> Result<MediaCapture, CameraError> {
        media::open(&self.media_devices()?, constraints).await
    }

    async fn attach_stream(&self, stream: &MediaCapture) -> Result<(), CameraError> {
        media::attach(&self.video, stream).await
    }
}

#[async_trait(?Send)]
impl Platform for WebPlatform {
    type Detector = WebHandDetector;
    type Surface = CanvasSurface;
    type Pump = FramePump;
    type Subscription = Option<ResizeSubscription>;

    async fn load_detector(&self, config: &DetectorConfig) -> Result<WebHandDetector, PointerError> {
        WebHandDetector::load(config, self.video.clone()).await
    }

    fn surface(&self) -> Result<CanvasSurface, PointerError> {
        CanvasSurface::from_document(&self.document, &self.canvas_id, self.video.clone())
    }

    fn viewport_size(&self) -> (f64, f64) {
        let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        (
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn video_frame(&self) -> VideoFrameInfo {
        VideoFrameInfo {
            has_current_data: self.video.ready_state() >= HAVE_CURRENT_DATA,
            width: self.video.video_width(),
            height: self.video.video_height(),
        }
    }

    fn frame_schedule(&self) -> FrameSchedule {
        if supports_video_frame_callback(&self.video) {
            FrameSchedule::VideoFrame
        } else {
            FrameSchedule::AnimationFrame
        }
    }

    fn start_frame_pump(&self, schedule: FrameSchedule, tick: FrameCallback) -> FramePump {
        FramePump::start(self.window.clone(), self.video.clone(), schedule, tick)
    }

    fn on_resize(&self, callback: Box<dyn FnMut()>) -> Option<ResizeSubscription> {
        match ResizeSubscription::new(self.window.clone(), callback) {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                warn!(error = ?err, "resize listener could not be installed");
                None
            }
        }
    }

    fn spawn_local(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
