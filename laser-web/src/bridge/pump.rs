//! Frame scheduling and window resize listeners
//!
//! The pump requests the next frame only after the tick returns, so ticks
//! never overlap.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Function, Reflect};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlVideoElement, Window};

use crate::session::{FrameCallback, FrameSchedule};

const REQUEST_VIDEO_FRAME: &str = "requestVideoFrameCallback";
const CANCEL_VIDEO_FRAME: &str = "cancelVideoFrameCallback";

/// `requestVideoFrameCallback` is missing from older engines
pub(crate) fn supports_video_frame_callback(video: &HtmlVideoElement) -> bool {
    Reflect::get(video, &JsValue::from_str(REQUEST_VIDEO_FRAME))
        .map(|f| f.is_function())
        .unwrap_or(false)
}

fn video_method(video: &HtmlVideoElement, name: &str) -> Result<Function, JsValue> {
    Reflect::get(video, &JsValue::from_str(name))?.dyn_into::<Function>()
}

struct PumpInner {
    schedule: FrameSchedule,
    window: Window,
    video: HtmlVideoElement,
    cancelled: Cell<bool>,
    /// Id of the pending request
    handle: Cell<Option<f64>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl PumpInner {
    fn request_next(&self) {
        if self.cancelled.get() {
            return;
        }
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        let function: &Function = callback.as_ref().unchecked_ref();

        let handle = match self.schedule {
            FrameSchedule::VideoFrame => video_method(&self.video, REQUEST_VIDEO_FRAME)
                .and_then(|request| request.call1(&self.video, function))
                .map(|id| id.as_f64().unwrap_or_default()),
            FrameSchedule::AnimationFrame => self
                .window
                .request_animation_frame(function)
                .map(f64::from),
        };

        match handle {
            Ok(id) => self.handle.set(Some(id)),
            Err(err) => warn!(error = ?err, schedule = ?self.schedule, "frame request failed"),
        }
    }

    fn cancel_pending(&self) {
        let Some(id) = self.handle.take() else {
            return;
        };
        let result = match self.schedule {
            FrameSchedule::VideoFrame => video_method(&self.video, CANCEL_VIDEO_FRAME)
                .and_then(|cancel| cancel.call1(&self.video, &JsValue::from_f64(id)))
                .map(|_| ()),
            FrameSchedule::AnimationFrame => self.window.cancel_animation_frame(id as i32),
        };
        if let Err(err) = result {
            warn!(error = ?err, "frame cancel failed");
        }
    }
}

/// Running frame loop. Dropping it cancels the pending frame.
pub struct FramePump {
    inner: Rc<PumpInner>,
}

impl FramePump {
    pub fn start(
        window: Window,
        video: HtmlVideoElement,
        schedule: FrameSchedule,
        mut tick: FrameCallback,
    ) -> Self {
        let inner = Rc::new(PumpInner {
            schedule,
            window,
            video,
            cancelled: Cell::new(false),
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move |now_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.handle.set(None);
            if inner.cancelled.get() {
                return;
            }
            tick(now_ms);
            inner.request_next();
        }) as Box<dyn FnMut(f64)>);

        *inner.callback.borrow_mut() = Some(closure);
        inner.request_next();
        Self { inner }
    }
}

impl Drop for FramePump {
    fn drop(&mut self) {
        self.inner.cancelled.set(true);
        self.inner.cancel_pending();
        self.inner.callback.borrow_mut().take();
    }
}

/// Window `resize` listener. Dropping it removes the listener.
pub struct ResizeSubscription {
    window: Window,
    listener: Closure<dyn FnMut()>,
}

impl ResizeSubscription {
    pub fn new(window: Window, callback: Box<dyn FnMut()>) -> Result<Self, JsValue> {
        let listener = Closure::wrap(callback);
        window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
        Ok(Self { window, listener })
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.listener.as_ref().unchecked_ref());
    }
}
