//! getUserMedia plumbing - constraint objects, device enumeration, playback

use js_sys::{Array, Function, Object, Promise, Reflect};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    HtmlVideoElement, MediaDeviceInfo, MediaDeviceKind, MediaDevices, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use crate::camera::{
    CameraDevice, CameraStream, CaptureConstraints, DeviceKind, FacingConstraint, FacingMode,
};
use crate::config::CaptureTarget;
use crate::error::CameraError;

/// `HAVE_FUTURE_DATA`: enough buffered to fire `canplay`
const HAVE_FUTURE_DATA: u16 = 3;

// ============================================================================
// CONSTRAINTS
// ============================================================================

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn constrain(kind: &str, value: JsValue) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    set(&obj, kind, &value)?;
    Ok(obj.into())
}

fn ideal_and_max(value: u32) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    set(&obj, "ideal", &JsValue::from(value))?;
    set(&obj, "max", &JsValue::from(value))?;
    Ok(obj.into())
}

fn resolution(target: &CaptureTarget, video: &Object) -> Result<(), JsValue> {
    set(video, "width", &ideal_and_max(target.width)?)?;
    set(video, "height", &ideal_and_max(target.height)?)?;
    set(video, "frameRate", &ideal_and_max(target.frame_rate)?)
}

/// `MediaTrackConstraints` for one attempt, or `true` when unconstrained
fn video_constraints(constraints: &CaptureConstraints) -> Result<JsValue, JsValue> {
    if constraints.is_unconstrained() {
        return Ok(JsValue::TRUE);
    }

    let video = Object::new();
    if let Some(id) = &constraints.device_id {
        set(&video, "deviceId", &constrain("exact", JsValue::from_str(id))?)?;
    }
    if let Some(facing) = constraints.facing {
        let value = match facing {
            FacingConstraint::Exact(mode) => constrain("exact", mode.as_str().into())?,
            FacingConstraint::Ideal(mode) => constrain("ideal", mode.as_str().into())?,
            FacingConstraint::Bare(mode) => JsValue::from_str(mode.as_str()),
        };
        set(&video, "facingMode", &value)?;
    }
    if let Some(target) = &constraints.resolution {
        resolution(target, &video)?;
    }
    Ok(video.into())
}

// ============================================================================
// DEVICES
// ============================================================================

pub(crate) async fn enumerate(devices: &MediaDevices) -> Result<Vec<CameraDevice>, CameraError> {
    let promise = devices
        .enumerate_devices()
        .map_err(|e| CameraError::from_js(&e))?;
    let list = JsFuture::from(promise)
        .await
        .map_err(|e| CameraError::from_js(&e))?;

    let devices = Array::from(&list)
        .iter()
        .filter_map(|value| value.dyn_into::<MediaDeviceInfo>().ok())
        .filter_map(|info| {
            let kind = match info.kind() {
                MediaDeviceKind::Videoinput => DeviceKind::VideoInput,
                MediaDeviceKind::Audioinput => DeviceKind::AudioInput,
                MediaDeviceKind::Audiooutput => DeviceKind::AudioOutput,
                _ => return None,
            };
            Some(CameraDevice {
                id: info.device_id(),
                label: info.label(),
                kind,
            })
        })
        .collect();
    Ok(devices)
}

pub(crate) async fn open(
    devices: &MediaDevices,
    constraints: &CaptureConstraints,
) -> Result<MediaCapture, CameraError> {
    let request = MediaStreamConstraints::new();
    request.set_audio(&JsValue::FALSE);
    request.set_video(&video_constraints(constraints).map_err(|e| CameraError::from_js(&e))?);

    let promise = devices
        .get_user_media_with_constraints(&request)
        .map_err(|e| CameraError::from_js(&e))?;
    let mut pending = PendingRequest {
        promise,
        settled: false,
    };
    let result = JsFuture::from(pending.promise.clone()).await;
    pending.settled = true;

    let stream = result
        .map_err(|e| CameraError::from_js(&e))?
        .dyn_into::<MediaStream>()
        .map_err(|_| CameraError::Other("getUserMedia did not return a MediaStream".into()))?;

    Ok(MediaCapture {
        stream,
        on_ended: None,
    })
}

/// In-flight `getUserMedia` request. Dropped before it settles, the stream
/// it eventually yields is stopped on arrival.
struct PendingRequest {
    promise: Promise,
    settled: bool,
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let stop_late = Closure::once_into_js(|value: JsValue| {
            if let Ok(stream) = value.dyn_into::<MediaStream>() {
                stop_tracks(&stream);
                debug!(id = %stream.id(), "late camera stream stopped");
            }
        });
        let ignore_rejection = Function::new_no_args("");
        let chained = Reflect::get(&self.promise, &JsValue::from_str("then"))
            .and_then(|then| then.dyn_into::<Function>())
            .and_then(|then| then.call2(&self.promise, &stop_late, &ignore_rejection));
        if let Err(err) = chained {
            warn!(error = ?err, "could not release an abandoned camera request");
        }
    }
}

/// `canplay` listener on the shared video element, removed on drop
struct CanPlayListener {
    video: HtmlVideoElement,
    resolve: Option<Function>,
}

impl Drop for CanPlayListener {
    fn drop(&mut self) {
        if let Some(resolve) = self.resolve.take() {
            let _ = self
                .video
                .remove_event_listener_with_callback("canplay", &resolve);
        }
    }
}

/// Resolve once the element has buffered enough to play
async fn can_play(video: &HtmlVideoElement) {
    let mut listener = CanPlayListener {
        video: video.clone(),
        resolve: None,
    };
    let ready = Promise::new(&mut |resolve, _reject| {
        match video.add_event_listener_with_callback("canplay", &resolve) {
            Ok(()) => listener.resolve = Some(resolve),
            Err(err) => {
                warn!(error = ?err, "canplay listener could not be installed");
                let _ = resolve.call0(&JsValue::UNDEFINED);
            }
        }
    });
    let _ = JsFuture::from(ready).await;
    drop(listener);
}

/// Wire the stream to the video element and start playback
pub(crate) async fn attach(video: &HtmlVideoElement, capture: &MediaCapture) -> Result<(), CameraError> {
    video.set_muted(true);
    video.set_autoplay(true);
    video
        .set_attribute("playsinline", "")
        .map_err(|e| CameraError::from_js(&e))?;
    video.set_src_object(Some(&capture.stream));

    if video.ready_state() < HAVE_FUTURE_DATA {
        can_play(video).await;
    }

    let playing = video.play().map_err(|e| CameraError::from_js(&e))?;
    JsFuture::from(playing)
        .await
        .map_err(|e| CameraError::from_js(&e))?;

    if let Some(track) = capture.video_track() {
        let settings = track.get_settings();
        info!(
            width = ?Reflect::get(&settings, &"width".into()).ok().and_then(|v| v.as_f64()),
            height = ?Reflect::get(&settings, &"height".into()).ok().and_then(|v| v.as_f64()),
            frame_rate = ?Reflect::get(&settings, &"frameRate".into()).ok().and_then(|v| v.as_f64()),
            "negotiated camera settings"
        );
    }
    Ok(())
}

// ============================================================================
// STREAM HANDLE
// ============================================================================

/// Owned `MediaStream`. Dropping it stops every track.
pub struct MediaCapture {
    stream: MediaStream,
    on_ended: Option<Closure<dyn FnMut()>>,
}

impl MediaCapture {
    fn video_track(&self) -> Option<MediaStreamTrack> {
        self.stream
            .get_video_tracks()
            .get(0)
            .dyn_into::<MediaStreamTrack>()
            .ok()
    }
}

impl CameraStream for MediaCapture {
    fn label(&self) -> String {
        self.video_track().map(|t| t.label()).unwrap_or_default()
    }

    fn resolved_facing(&self) -> Option<FacingMode> {
        let settings = self.video_track()?.get_settings();
        Reflect::get(&settings, &JsValue::from_str("facingMode"))
            .ok()?
            .as_string()
            .and_then(|value| FacingMode::parse(&value))
    }

    fn on_track_ended(&mut self, callback: Box<dyn FnMut()>) {
        let closure = Closure::wrap(callback);
        if let Some(track) = self.video_track() {
            track.set_onended(Some(closure.as_ref().unchecked_ref()));
        }
        self.on_ended = Some(closure);
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.set_onended(None);
            track.stop();
        }
    }
}

impl Drop for MediaCapture {
    fn drop(&mut self) {
        stop_tracks(&self.stream);
        debug!(id = %self.stream.id(), "camera stream stopped");
    }
}
