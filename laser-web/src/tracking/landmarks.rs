//! Hand landmark schema (MediaPipe Hands - 21 points)
//!
//! The detector hands us a flat `[x, y, z] * 21` array per frame.
//! Nothing here is retained between frames.

use tracing::warn;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of keypoints per hand
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Floats per keypoint in the detector output (x, y, z)
pub const LANDMARK_STRIDE: usize = 3;

/// Hand skeleton connections for rendering.
///
/// Finger chains hang off the knuckle row (5-9-13-17) like the detector's
/// own drawing utils; the last edge closes the palm base.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single keypoint. x/y normalized to the video frame, z is relative depth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One detected hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    pub points: [HandLandmark; HAND_LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [HandLandmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Parse the detector's flat Float32Array (21 x 3 values).
    ///
    /// Returns `None` on a length mismatch or non-finite coordinates.
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        if data.len() != HAND_LANDMARK_COUNT * LANDMARK_STRIDE {
            warn!(
                len = data.len(),
                expected = HAND_LANDMARK_COUNT * LANDMARK_STRIDE,
                "invalid hand landmark data length"
            );
            return None;
        }

        if data.iter().any(|v| !v.is_finite()) {
            warn!("hand landmark data contains non-finite values");
            return None;
        }

        let mut points = [HandLandmark::default(); HAND_LANDMARK_COUNT];
        for (point, chunk) in points.iter_mut().zip(data.chunks_exact(LANDMARK_STRIDE)) {
            *point = HandLandmark {
                x: chunk[0],
                y: chunk[1],
                z: chunk[2],
            };
        }

        Some(Self { points })
    }

    /// Index finger MCP - ray origin
    pub fn index_knuckle(&self) -> HandLandmark {
        self.points[INDEX_MCP]
    }

    /// Index finger tip - ray aim point
    pub fn index_tip(&self) -> HandLandmark {
        self.points[INDEX_TIP]
    }
}
