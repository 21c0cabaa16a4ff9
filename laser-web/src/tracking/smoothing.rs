//! Exponential moving average - one-pole low-pass filter for landmark jitter
//!
//! `state = alpha * state + (1 - alpha) * sample`
//!
//! Higher alpha = smoother but laggier: the output trails a moving input in
//! proportion to alpha. State persists across frames for the whole tracking
//! session and is only reset when a new session starts.

use nalgebra::Vector2;

use crate::config::SmoothingConfig;

/// Filter state for one tracked 2D quantity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingState {
    pub value: Vector2<f64>,
    /// `false` = next sample is taken verbatim (no snap-in from zero)
    pub initialized: bool,
}

impl SmoothingState {
    pub fn new() -> Self {
        Self {
            value: Vector2::zeros(),
            initialized: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SmoothingState {
    fn default() -> Self {
        Self::new()
    }
}

/// Blend `observed` into `state` and return the new smoothed value.
///
/// The first sample after a reset is returned unchanged.
pub fn ema(observed: Vector2<f64>, state: &mut SmoothingState, alpha: f64) -> Vector2<f64> {
    if !state.initialized {
        state.value = observed;
        state.initialized = true;
    } else {
        state.value = state.value * alpha + observed * (1.0 - alpha);
    }
    state.value
}

/// EMA with its weight attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaFilter2D {
    alpha: f64,
    state: SmoothingState,
}

impl EmaFilter2D {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            state: SmoothingState::new(),
        }
    }

    pub fn filter(&mut self, observed: Vector2<f64>) -> Vector2<f64> {
        ema(observed, &mut self.state, self.alpha)
    }

    pub fn state(&self) -> &SmoothingState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}

/// Per-session smoothing for the pointer: both endpoints and the ray direction.
///
/// Direction gets its own filter because normalizing a short knuckle-tip
/// segment amplifies endpoint jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSmoothing {
    pub knuckle: EmaFilter2D,
    pub tip: EmaFilter2D,
    pub direction: EmaFilter2D,
}

impl PointerSmoothing {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            knuckle: EmaFilter2D::new(config.endpoint_alpha),
            tip: EmaFilter2D::new(config.endpoint_alpha),
            direction: EmaFilter2D::new(config.direction_alpha),
        }
    }

    pub fn reset(&mut self) {
        self.knuckle.reset();
        self.tip.reset();
        self.direction.reset();
    }

    pub fn is_initialized(&self) -> bool {
        self.knuckle.state().initialized
            || self.tip.state().initialized
            || self.direction.state().initialized
    }
}

impl Default for PointerSmoothing {
    fn default() -> Self {
        Self::new(&SmoothingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_segment(p: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> bool {
        let ab = b - a;
        let ap = p - a;
        let cross = ab.x * ap.y - ab.y * ap.x;
        let t = if ab.norm_squared() > 0.0 { ap.dot(&ab) / ab.norm_squared() } else { 0.0 };
        let tolerance = 1e-9 * (ab.norm() * ap.norm()).max(1.0);
        cross.abs() < tolerance && (-1e-9..=1.0 + 1e-9).contains(&t)
    }

    #[test]
    fn test_first_sample_passes_through() {
        for alpha in [0.05, 0.4, 0.5, 0.95] {
            let mut state = SmoothingState::new();
            let out = ema(Vector2::new(120.0, -7.5), &mut state, alpha);
            assert_eq!(out, Vector2::new(120.0, -7.5));
            assert!(state.initialized);
        }
    }

    #[test]
    fn test_output_is_convex_combination() {
        let samples = [
            Vector2::new(10.0, 10.0),
            Vector2::new(30.0, -5.0),
            Vector2::new(-40.0, 12.0),
            Vector2::new(0.0, 0.0),
            Vector2::new(1000.0, 3.0),
        ];
        for alpha in [0.1, 0.4, 0.5, 0.9] {
            let mut state = SmoothingState::new();
            ema(samples[0], &mut state, alpha);
            for sample in samples.iter().skip(1) {
                let prev = state.value;
                let out = ema(*sample, &mut state, alpha);
                assert!(on_segment(out, prev, *sample), "alpha {alpha}: {out:?}");
            }
        }
    }

    #[test]
    fn test_known_blend() {
        let mut state = SmoothingState::new();
        ema(Vector2::new(0.0, 0.0), &mut state, 0.4);
        let out = ema(Vector2::new(10.0, 20.0), &mut state, 0.4);
        assert!((out.x - 6.0).abs() < 1e-12);
        assert!((out.y - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_higher_alpha_lags_more() {
        let mut smooth = EmaFilter2D::new(0.8);
        let mut snappy = EmaFilter2D::new(0.2);
        smooth.filter(Vector2::zeros());
        snappy.filter(Vector2::zeros());
        let target = Vector2::new(100.0, 0.0);
        let a = smooth.filter(target);
        let b = snappy.filter(target);
        assert!(a.x < b.x);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut smoothing = PointerSmoothing::default();
        smoothing.knuckle.filter(Vector2::new(5.0, 5.0));
        assert!(smoothing.is_initialized());
        smoothing.reset();
        assert!(!smoothing.is_initialized());
        let out = smoothing.knuckle.filter(Vector2::new(50.0, 60.0));
        assert_eq!(out, Vector2::new(50.0, 60.0));
    }
}
