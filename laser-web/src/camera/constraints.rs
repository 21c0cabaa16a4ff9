//! Capture constraint candidates, most specific first
//!
//! Platforms disagree about which constraints they honour (multi-lens phones
//! report inconsistent capabilities, desktop webcams ignore facing), so every
//! request is backed by progressively weaker fallbacks.

use super::device::{rank_back_cameras, CameraDevice, FacingMode};
use crate::config::CaptureTarget;

/// How strictly a facing mode is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingConstraint {
    /// `{ facingMode: { exact } }` - fails if unavailable
    Exact(FacingMode),
    /// `{ facingMode: { ideal } }`
    Ideal(FacingMode),
    /// `{ facingMode: "..." }`
    Bare(FacingMode),
}

/// One `getUserMedia` video request. All `None` = `{ video: true }`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureConstraints {
    /// Always requested as `exact`
    pub device_id: Option<String>,
    pub facing: Option<FacingConstraint>,
    /// Width / height / frame rate, each as both `ideal` and `max`
    pub resolution: Option<CaptureTarget>,
}

impl CaptureConstraints {
    /// Unconstrained video
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.device_id.is_none() && self.facing.is_none() && self.resolution.is_none()
    }

    fn device(id: &str, resolution: Option<CaptureTarget>) -> Self {
        Self {
            device_id: Some(id.to_string()),
            facing: None,
            resolution,
        }
    }

    fn facing(facing: FacingConstraint, resolution: Option<CaptureTarget>) -> Self {
        Self {
            device_id: None,
            facing: Some(facing),
            resolution,
        }
    }
}

/// Ordered constraint attempts for the current selection.
///
/// An explicit device wins over the facing preference. With the back camera
/// preferred, the best ranked back lens is tried before generic facing
/// requests so multi-lens phones don't land on the ultra wide.
pub fn build_attempts(
    devices: &[CameraDevice],
    facing: FacingMode,
    device_id: Option<&str>,
    target: &CaptureTarget,
) -> Vec<CaptureConstraints> {
    let target = Some(*target);

    if let Some(id) = device_id {
        return vec![
            CaptureConstraints::device(id, target),
            CaptureConstraints::device(id, None),
        ];
    }

    let mut attempts = Vec::with_capacity(5);

    if facing == FacingMode::Environment {
        if let Some(main_back) = rank_back_cameras(devices).first() {
            attempts.push(CaptureConstraints::device(&main_back.id, target));
        }
    }

    attempts.push(CaptureConstraints::facing(FacingConstraint::Exact(facing), target));
    attempts.push(CaptureConstraints::facing(FacingConstraint::Ideal(facing), target));
    attempts.push(CaptureConstraints::facing(FacingConstraint::Bare(facing), None));
    attempts.push(CaptureConstraints::any());

    attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> Vec<CameraDevice> {
        vec![
            CameraDevice::video("front", "Front Camera"),
            CameraDevice::video("uw", "Back Ultra Wide Camera"),
            CameraDevice::video("main", "Back Camera"),
        ]
    }

    #[test]
    fn test_explicit_device_attempts() {
        let target = CaptureTarget::default();
        let attempts = build_attempts(&phone(), FacingMode::Environment, Some("uw"), &target);
        assert_eq!(
            attempts,
            vec![
                CaptureConstraints {
                    device_id: Some("uw".into()),
                    facing: None,
                    resolution: Some(target),
                },
                CaptureConstraints {
                    device_id: Some("uw".into()),
                    facing: None,
                    resolution: None,
                },
            ]
        );
    }

    #[test]
    fn test_back_facing_tries_main_lens_first() {
        let target = CaptureTarget::default();
        let attempts = build_attempts(&phone(), FacingMode::Environment, None, &target);
        assert_eq!(attempts.len(), 5);
        assert_eq!(attempts[0].device_id.as_deref(), Some("main"));
        assert_eq!(attempts[0].resolution, Some(target));
        assert_eq!(attempts[1].facing, Some(FacingConstraint::Exact(FacingMode::Environment)));
        assert_eq!(attempts[2].facing, Some(FacingConstraint::Ideal(FacingMode::Environment)));
        assert_eq!(attempts[3].facing, Some(FacingConstraint::Bare(FacingMode::Environment)));
        assert_eq!(attempts[3].resolution, None);
        assert!(attempts[4].is_unconstrained());
    }

    #[test]
    fn test_front_facing_skips_device_ranking() {
        let attempts = build_attempts(&phone(), FacingMode::User, None, &CaptureTarget::default());
        assert_eq!(attempts.len(), 4);
        assert!(attempts.iter().all(|a| a.device_id.is_none()));
        assert_eq!(attempts[0].facing, Some(FacingConstraint::Exact(FacingMode::User)));
    }

    #[test]
    fn test_no_labels_means_no_device_attempt() {
        // before permission is granted labels are empty
        let devices = vec![CameraDevice::video("a", ""), CameraDevice::video("b", "")];
        let attempts = build_attempts(&devices, FacingMode::Environment, None, &CaptureTarget::default());
        assert_eq!(attempts.len(), 4);
        assert!(attempts[0].device_id.is_none());
    }
}
