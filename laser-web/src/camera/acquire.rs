//! Stream acquisition - walk the constraint candidates until one attaches

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::constraints::{build_attempts, CaptureConstraints};
use super::device::{CameraDevice, DeviceKind, FacingMode};
use crate::config::CaptureTarget;
use crate::error::{CameraError, PointerError};

/// A live capture session.
///
/// Dropping the handle stops every track it owns and releases the hardware.
pub trait CameraStream {
    /// Label of the active video track
    fn label(&self) -> String;

    /// Facing mode the platform actually negotiated, if it reports one
    fn resolved_facing(&self) -> Option<FacingMode>;

    /// Invoked when the video track ends without us stopping it
    /// (hardware reclaimed by the OS, device unplugged)
    fn on_track_ended(&mut self, callback: Box<dyn FnMut()>);
}

/// Platform camera access
#[async_trait(?Send)]
pub trait CameraBackend {
    type Stream: CameraStream;

    /// All media devices. May prompt for nothing; labels may be empty.
    async fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, CameraError>;

    /// Request a stream. May show the permission prompt on first use.
    async fn open_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Self::Stream, CameraError>;

    /// Attach to the display element (muted, inline, autoplay), wait until it
    /// can play, then start playback.
    async fn attach_stream(&self, stream: &Self::Stream) -> Result<(), CameraError>;
}

/// Enumerate video inputs, priming permission first so labels are populated.
///
/// Never fails: a denied prompt or broken enumeration gives an empty list and
/// acquisition falls back to facing constraints.
pub async fn list_cameras<B>(backend: &B) -> Vec<CameraDevice>
where
    B: CameraBackend + ?Sized,
{
    match backend.open_stream(&CaptureConstraints::any()).await {
        Ok(permission) => drop(permission),
        Err(err) => debug!(error = %err, "permission request failed"),
    }

    match backend.enumerate_devices().await {
        Ok(devices) => devices
            .into_iter()
            .filter(|d| d.kind == DeviceKind::VideoInput)
            .collect(),
        Err(err) => {
            warn!(error = %err, "device enumeration failed");
            Vec::new()
        }
    }
}

/// Open and attach a stream for the current selection.
///
/// Each candidate's failure is swallowed and the next, weaker one is tried.
/// Only exhaustion fails, carrying the last underlying error.
pub async fn acquire_stream<B>(
    backend: &B,
    devices: &[CameraDevice],
    facing: FacingMode,
    device_id: Option<&str>,
    target: &CaptureTarget,
) -> Result<B::Stream, PointerError>
where
    B: CameraBackend + ?Sized,
{
    let attempts = build_attempts(devices, facing, device_id, target);
    let mut last_error = CameraError::NoMatchingDevice("no capture constraints to try".into());

    for (attempt, constraints) in attempts.iter().enumerate() {
        let stream = match backend.open_stream(constraints).await {
            Ok(stream) => stream,
            Err(err) => {
                debug!(attempt, ?constraints, error = %err, "camera constraints rejected");
                last_error = err;
                continue;
            }
        };

        match backend.attach_stream(&stream).await {
            Ok(()) => {
                info!(
                    attempt,
                    label = %stream.label(),
                    facing = ?stream.resolved_facing(),
                    "📷 camera stream attached"
                );
                return Ok(stream);
            }
            Err(err) => {
                debug!(attempt, error = %err, "camera stream failed to start playback");
                // stops the tracks before the next request
                drop(stream);
                last_error = err;
            }
        }
    }

    Err(PointerError::AcquisitionFailed(last_error))
}
