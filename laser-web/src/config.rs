//! Pipeline configuration
//!
//! Every field has a default, so the JS side can pass a partial JSON object
//! (or nothing at all).

use serde::Deserialize;

use crate::camera::FacingMode;
use crate::error::PointerError;
use crate::geometry::{FitMode, ViewportBudget};

/// Default MediaPipe tasks-vision wasm bundle
pub const DEFAULT_WASM_ROOT: &str =
    "https://cdn.jsdelivr.net/npm/@mediapipe/tasks-vision@0.10.0/wasm";

/// Default hand landmarker model
pub const DEFAULT_MODEL_ASSET_PATH: &str =
    "https://storage.googleapis.com/mediapipe-assets/hand_landmarker.task";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub viewport: ViewportBudget,
    pub capture: CaptureTarget,
    pub smoothing: SmoothingConfig,
    pub render: RenderConfig,
    pub detector: DetectorConfig,
    pub dom: DomConfig,
    pub default_facing: FacingMode,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportBudget::default(),
            capture: CaptureTarget::default(),
            smoothing: SmoothingConfig::default(),
            render: RenderConfig::default(),
            detector: DetectorConfig::default(),
            dom: DomConfig::default(),
            default_facing: FacingMode::Environment,
        }
    }
}

impl PointerConfig {
    /// Parse and validate a JSON configuration object
    pub fn from_json(json: &str) -> Result<Self, PointerError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PointerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PointerError> {
        for (name, alpha) in [
            ("smoothing.endpoint_alpha", self.smoothing.endpoint_alpha),
            ("smoothing.direction_alpha", self.smoothing.direction_alpha),
        ] {
            if !(0.0..1.0).contains(&alpha) {
                return Err(PointerError::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {alpha}"
                )));
            }
        }

        let factor = self.render.ray_length_factor;
        if !factor.is_finite() || factor <= 1.0 {
            return Err(PointerError::InvalidConfig(format!(
                "render.ray_length_factor must exceed 1 so the ray leaves the screen, got {factor}"
            )));
        }

        if self.viewport.max_width < 1.0 || self.viewport.max_height < 1.0 {
            return Err(PointerError::InvalidConfig(
                "viewport budget must be at least 1x1".into(),
            ));
        }

        if self.capture.width == 0 || self.capture.height == 0 || self.capture.frame_rate == 0 {
            return Err(PointerError::InvalidConfig(
                "capture target dimensions and frame rate must be non-zero".into(),
            ));
        }

        Ok(())
    }
}

/// Requested capture format. Used as both `ideal` and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureTarget {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

impl Default for CaptureTarget {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_rate: 30,
        }
    }
}

/// EMA weights. Higher = smoother, slower.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub endpoint_alpha: f64,
    pub direction_alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            endpoint_alpha: 0.4,
            direction_alpha: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fit_mode: FitMode,
    /// Ray length as a multiple of the viewport diagonal
    pub ray_length_factor: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fit_mode: FitMode::Cover,
            ray_length_factor: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub wasm_root: String,
    pub model_asset_path: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            wasm_root: DEFAULT_WASM_ROOT.to_string(),
            model_asset_path: DEFAULT_MODEL_ASSET_PATH.to_string(),
        }
    }
}

/// Element ids the browser bridge binds to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    pub canvas_id: String,
    pub video_id: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            canvas_id: "pointer-canvas".to_string(),
            video_id: "pointer-video".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PointerConfig::default();
        assert_eq!(config.viewport.max_width, 1280.0);
        assert_eq!(config.viewport.max_height, 720.0);
        assert_eq!(config.capture.frame_rate, 30);
        assert_eq!(config.smoothing.endpoint_alpha, 0.4);
        assert_eq!(config.smoothing.direction_alpha, 0.5);
        assert_eq!(config.render.fit_mode, FitMode::Cover);
        assert_eq!(config.default_facing, FacingMode::Environment);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PointerConfig::from_json(
            r#"{ "smoothing": { "endpoint_alpha": 0.6 }, "default_facing": "user" }"#,
        )
        .unwrap();
        assert_eq!(config.smoothing.endpoint_alpha, 0.6);
        assert_eq!(config.smoothing.direction_alpha, 0.5);
        assert_eq!(config.default_facing, FacingMode::User);
        assert_eq!(config.dom.canvas_id, "pointer-canvas");
    }

    #[test]
    fn test_rejects_out_of_range_alpha() {
        let err = PointerConfig::from_json(r#"{ "smoothing": { "direction_alpha": 1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, PointerError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_short_ray() {
        let err = PointerConfig::from_json(r#"{ "render": { "ray_length_factor": 0.5 } }"#)
            .unwrap_err();
        assert!(matches!(err, PointerError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(PointerConfig::from_json("{ not json").is_err());
    }
}
