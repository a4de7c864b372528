//! Tween engine for tile visuals.
//!
//! This crate is the animation primitive consumed by `mosaic-focus`:
//! - **Tweens**: timed interpolation of a tile's full visual state
//!   (position, rotation, scale, dimensions)
//! - **Easing Functions**: CSS-compatible timing curves
//! - **Mid-flight sampling**: the current value of a running tween can be
//!   read at any point, and cancellation returns the value at the instant
//!   of cancellation
//!
//! # Architecture
//!
//! ```text
//! TweenEngine
//!   └── Active tweens (one per tile), advanced once per frame
//!
//! callers sample current visuals during rendering and receive
//! CompletedTween records from advance()
//! ```

pub mod easing;
pub mod interpolate;
pub mod tween;
pub mod types;

pub use easing::EasingFunction;
pub use interpolate::Interpolate;
pub use tween::{ActiveTween, CompletedTween, TweenEngine, TweenSpec};
pub use types::{AnimationId, AnimationState, Dimensions, Placement, TileId, Visual};
