//! Error types for camera acquisition, detector loading and rendering

use thiserror::Error;

/// Failure of a single camera request, classified from the platform error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),
    #[error("no camera matches the requested constraints: {0}")]
    NoMatchingDevice(String),
    #[error("camera is busy or unreadable: {0}")]
    DeviceBusy(String),
    #[error("camera request failed: {0}")]
    Other(String),
}

impl CameraError {
    /// Classify a `DOMException` by its `name`
    pub fn from_dom_exception(name: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => {
                CameraError::PermissionDenied(message)
            }
            "NotFoundError" | "OverconstrainedError" | "DevicesNotFoundError" => {
                CameraError::NoMatchingDevice(message)
            }
            "NotReadableError" | "AbortError" | "TrackStartError" => {
                CameraError::DeviceBusy(message)
            }
            _ => CameraError::Other(message),
        }
    }
}

/// Errors surfaced by the pointer pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointerError {
    /// Every constraint candidate failed; carries the last cause
    #[error("camera acquisition failed: {0}")]
    AcquisitionFailed(#[source] CameraError),
    #[error("hand detector failed to load: {0}")]
    DetectorLoadFailed(String),
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// A single frame could not be analysed. Never terminal.
    #[error("frame detection failed: {0}")]
    Detection(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(target_arch = "wasm32")]
impl From<PointerError> for wasm_bindgen::JsValue {
    fn from(err: PointerError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl CameraError {
    /// Classify a rejected `getUserMedia` / `play()` promise
    pub fn from_js(err: &wasm_bindgen::JsValue) -> Self {
        let field = |key: &str| {
            js_sys::Reflect::get(err, &wasm_bindgen::JsValue::from_str(key))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default()
        };
        let message = field("message");
        let message = if message.is_empty() {
            format!("{err:?}")
        } else {
            message
        };
        Self::from_dom_exception(&field("name"), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_exception_classification() {
        assert_eq!(
            CameraError::from_dom_exception("NotAllowedError", "denied"),
            CameraError::PermissionDenied("denied".into())
        );
        assert_eq!(
            CameraError::from_dom_exception("OverconstrainedError", "facingMode"),
            CameraError::NoMatchingDevice("facingMode".into())
        );
        assert_eq!(
            CameraError::from_dom_exception("NotReadableError", "in use"),
            CameraError::DeviceBusy("in use".into())
        );
        assert_eq!(
            CameraError::from_dom_exception("TypeError", "bad"),
            CameraError::Other("bad".into())
        );
    }

    #[test]
    fn test_acquisition_error_keeps_cause() {
        let err = PointerError::AcquisitionFailed(CameraError::DeviceBusy("busy".into()));
        assert_eq!(
            err.to_string(),
            "camera acquisition failed: camera is busy or unreadable: busy"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
