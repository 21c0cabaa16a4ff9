//! `LaserPointer` - the handle the page holds
//!
//! ```js
//! import init, { LaserPointer } from "./pkg/laser_web.js";
//! await init();
//! const pointer = new LaserPointer(JSON.stringify({ default_facing: "user" }));
//! await pointer.start();
//! ```

use js_sys::{Array, Object, Promise, Reflect};
use tracing::info;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use super::platform::WebPlatform;
use crate::config::PointerConfig;
use crate::session::TrackingSession;

/// Called automatically when the wasm module loads
#[wasm_bindgen(start)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

#[wasm_bindgen]
pub struct LaserPointer {
    session: TrackingSession<WebPlatform>,
}

#[wasm_bindgen]
impl LaserPointer {
    /// `config_json` is a partial `PointerConfig`; omitted fields keep defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<LaserPointer, JsValue> {
        let config = match config_json {
            Some(json) => PointerConfig::from_json(&json)?,
            None => PointerConfig::default(),
        };
        let platform = WebPlatform::new(&config.dom)?;
        info!(canvas = %config.dom.canvas_id, video = %config.dom.video_id, "laser pointer created");
        Ok(Self {
            session: TrackingSession::new(platform, config),
        })
    }

    /// Resolves once tracking is running; rejects with the failure message
    pub fn start(&self) -> Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            session.start().await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn stop(&self) {
        self.session.stop();
    }

    #[wasm_bindgen(js_name = toggleFacing)]
    pub fn toggle_facing(&self) -> Promise {
        let session = self.session.clone();
        future_to_promise(async move {
            session.toggle_facing().await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `null` / `undefined` goes back to the facing preference
    #[wasm_bindgen(js_name = selectDevice)]
    pub fn select_device(&self, device_id: Option<String>) -> Promise {
        let session = self.session.clone();
        let device_id = device_id.filter(|id| !id.is_empty());
        future_to_promise(async move {
            session.select_device(device_id).await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `"user"` or `"environment"`
    pub fn facing(&self) -> String {
        self.session.facing().as_str().to_string()
    }

    #[wasm_bindgen(js_name = deviceId)]
    pub fn device_id(&self) -> Option<String> {
        self.session.device_id()
    }

    /// `[{ deviceId, label }]` for the camera picker
    pub fn devices(&self) -> Result<Array, JsValue> {
        let list = Array::new();
        for device in self.session.devices() {
            let entry = Object::new();
            Reflect::set(&entry, &"deviceId".into(), &JsValue::from_str(&device.id))?;
            Reflect::set(&entry, &"label".into(), &JsValue::from_str(&device.display_name()))?;
            list.push(&entry);
        }
        Ok(list)
    }

    pub fn state(&self) -> String {
        self.session.state().as_str().to_string()
    }

    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.session.last_error().map(|e| e.to_string())
    }
}
