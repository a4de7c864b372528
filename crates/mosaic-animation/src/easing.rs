//! Easing functions for tween timing.
//!
//! CSS-compatible timing functions: linear, the standard `ease` family, and
//! custom cubic bezier curves.
//!
//! # Usage
//!
//! ```
//! use mosaic_animation::easing::EasingFunction;
//!
//! let ease = EasingFunction::EaseInOut;
//! let progress = ease.evaluate(0.5);
//! assert!((progress - 0.5).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

/// Easing function mapping linear progress (0.0 to 1.0) to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,

    /// CSS `ease`: `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,

    /// CSS `ease-in`: `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// CSS `ease-out`: `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// CSS `ease-in-out`: `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve with control points (x1, y1) and (x2, y2).
    /// x values must be in [0, 1].
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Ease
    }
}

impl EasingFunction {
    /// Evaluate the easing function at progress `t`.
    ///
    /// Input is clamped to [0, 1]. Output may overshoot that range for
    /// bezier curves with y control points outside it.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Self::Linear => t,
            Self::Ease => bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => bezier(x1, y1, x2, y2, t),
        }
    }

    /// Create a custom cubic bezier easing function.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }
}

/// Evaluate one axis of the cubic bezier with implicit endpoints (0, 0) and
/// (1, 1): `b(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`.
#[inline]
fn axis(p1: f32, p2: f32, t: f32) -> f32 {
    let omt = 1.0 - t;
    3.0 * omt * omt * t * p1 + 3.0 * omt * t * t * p2 + t * t * t
}

/// Derivative of `axis` with respect to t.
#[inline]
fn axis_derivative(p1: f32, p2: f32, t: f32) -> f32 {
    let omt = 1.0 - t;
    3.0 * omt * omt * p1 + 6.0 * omt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Evaluate a cubic bezier timing curve at `progress`.
fn bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    axis(y1, y2, solve_for_t(x1, x2, progress))
}

/// Find the curve parameter whose x coordinate equals `target_x`.
///
/// Newton-Raphson iteration starting from the target itself; falls back to
/// bisection when the derivative flattens out near the endpoints.
fn solve_for_t(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;

    for _ in 0..8 {
        let error = axis(x1, x2, t) - target_x;
        if error.abs() < 1e-6 {
            return t;
        }
        let slope = axis_derivative(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }

    // Bisection fallback: x(t) is monotonic for x control points in [0, 1]
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    for _ in 0..24 {
        t = (lo + hi) * 0.5;
        if axis(x1, x2, t) < target_x {
            lo = t;
        } else {
            hi = t;
        }
    }
    t
}
