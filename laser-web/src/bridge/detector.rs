//! MediaPipe hand landmarker, reached through `js/hand_landmarker.js`

use js_sys::{Float32Array, Promise};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use crate::config::DetectorConfig;
use crate::error::PointerError;
use crate::session::HandDetector;
use crate::tracking::HandLandmarks;

#[wasm_bindgen(module = "/js/hand_landmarker.js")]
extern "C" {
    #[wasm_bindgen(js_name = createHandLandmarker, catch)]
    fn create_hand_landmarker(wasm_root: &str, model_asset_path: &str) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_name = detectHand, catch)]
    fn detect_hand(
        landmarker: &JsValue,
        video: &HtmlVideoElement,
        timestamp_ms: f64,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = closeHandLandmarker, catch)]
    fn close_hand_landmarker(landmarker: &JsValue) -> Result<(), JsValue>;
}

/// Loaded landmarker bound to the capture video. Closed on drop.
pub struct WebHandDetector {
    landmarker: JsValue,
    video: HtmlVideoElement,
}

impl WebHandDetector {
    pub async fn load(config: &DetectorConfig, video: HtmlVideoElement) -> Result<Self, PointerError> {
        let load_failed = |e: JsValue| PointerError::DetectorLoadFailed(format!("{e:?}"));

        let promise = create_hand_landmarker(&config.wasm_root, &config.model_asset_path)
            .map_err(load_failed)?;
        let landmarker = JsFuture::from(promise).await.map_err(load_failed)?;

        Ok(Self { landmarker, video })
    }
}

impl HandDetector for WebHandDetector {
    fn detect(&mut self, timestamp_ms: f64) -> Result<Option<HandLandmarks>, PointerError> {
        let result = detect_hand(&self.landmarker, &self.video, timestamp_ms)
            .map_err(|e| PointerError::Detection(format!("{e:?}")))?;

        if result.is_null() || result.is_undefined() {
            return Ok(None);
        }

        // malformed output is logged by from_flat and treated as no hand
        let flat = Float32Array::from(result).to_vec();
        Ok(HandLandmarks::from_flat(&flat))
    }
}

impl Drop for WebHandDetector {
    fn drop(&mut self) {
        if let Err(err) = close_hand_landmarker(&self.landmarker) {
            debug!(error = ?err, "hand landmarker close failed");
        }
    }
}
