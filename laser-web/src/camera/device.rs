//! Camera devices, facing preference and back-lens ranking

use serde::Deserialize;

/// Logical camera orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera (selfie). Rendered mirrored.
    User,
    /// Back camera
    #[default]
    Environment,
}

impl FacingMode {
    /// Constraint / settings value used by the platform
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(FacingMode::User),
            "environment" => Some(FacingMode::Environment),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }

    /// Front camera feeds are shown as a mirror
    pub fn is_mirrored(&self) -> bool {
        matches!(self, FacingMode::User)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// Snapshot of one enumerated device. Labels stay empty until the user has
/// granted camera permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
    pub kind: DeviceKind,
}

impl CameraDevice {
    pub fn video(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: DeviceKind::VideoInput,
        }
    }

    /// Label for pickers; unlabeled devices get a short id prefix
    pub fn display_name(&self) -> String {
        if self.label.is_empty() {
            let short: String = self.id.chars().take(6).collect();
            format!("Camera {short}…")
        } else {
            self.label.clone()
        }
    }
}

/// Lens behind a back-facing device, parsed from its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LensKind {
    Unknown = 0,
    Telephoto = 1,
    UltraWide = 2,
    /// Main wide lens. Unqualified labels ("Back Camera") are the main lens.
    Wide = 3,
}

impl LensKind {
    /// Heuristic over English vendor labels ("Back Ultra Wide Camera",
    /// "camera2 0, facing back", "Back Telephoto Camera").
    ///
    /// Known limitation: locale and vendor dependent. Devices with localized
    /// or unusual labels fall back to enumeration order.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.trim().is_empty() {
            LensKind::Unknown
        } else if label.contains("ultra") {
            LensKind::UltraWide
        } else if label.contains("tele") {
            LensKind::Telephoto
        } else {
            LensKind::Wide
        }
    }
}

/// Back-facing device by label ("back" / "rear")
pub fn is_back(device: &CameraDevice) -> bool {
    let label = device.label.to_lowercase();
    device.kind == DeviceKind::VideoInput && (label.contains("back") || label.contains("rear"))
}

/// Ranking score: wide/main 3, ultra wide 2, telephoto 1, unlabeled 0
pub fn score_back(device: &CameraDevice) -> u8 {
    LensKind::from_label(&device.label) as u8
}

/// Back devices, best lens first. Ties keep enumeration order.
pub fn rank_back_cameras(devices: &[CameraDevice]) -> Vec<&CameraDevice> {
    let mut back: Vec<&CameraDevice> = devices.iter().filter(|d| is_back(d)).collect();
    back.sort_by_key(|d| std::cmp::Reverse(score_back(d)));
    back
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_lens_ranking() {
        let devices = vec![
            CameraDevice::video("a", "Back Ultra Wide Camera"),
            CameraDevice::video("b", "Back Camera"),
            CameraDevice::video("c", "Back Telephoto Camera"),
            CameraDevice::video("d", "Front Camera"),
        ];
        let ranked: Vec<(&str, u8)> = rank_back_cameras(&devices)
            .into_iter()
            .map(|d| (d.label.as_str(), score_back(d)))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("Back Camera", 3),
                ("Back Ultra Wide Camera", 2),
                ("Back Telephoto Camera", 1),
            ]
        );
    }

    #[test]
    fn test_android_style_labels() {
        let rear = CameraDevice::video("x", "camera2 0, facing back");
        let front = CameraDevice::video("y", "camera2 1, facing front");
        let usb = CameraDevice::video("z", "Rear Wide Angle");
        assert!(is_back(&rear));
        assert!(!is_back(&front));
        assert!(is_back(&usb));
        assert_eq!(score_back(&usb), 3);
    }

    #[test]
    fn test_unlabeled_devices_are_not_back() {
        let device = CameraDevice::video("0123456789", "");
        assert!(!is_back(&device));
        assert_eq!(score_back(&device), 0);
        assert_eq!(device.display_name(), "Camera 012345…");
    }

    #[test]
    fn test_audio_devices_ignored() {
        let mic = CameraDevice {
            id: "m".into(),
            label: "Back Microphone".into(),
            kind: DeviceKind::AudioInput,
        };
        assert!(!is_back(&mic));
    }

    #[test]
    fn test_facing_toggle() {
        assert_eq!(FacingMode::Environment.toggled(), FacingMode::User);
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
        assert!(FacingMode::User.is_mirrored());
        assert_eq!(FacingMode::parse("environment"), Some(FacingMode::Environment));
        assert_eq!(FacingMode::parse("left"), None);
    }
}
