//! Core value types for the tween engine.
//!
//! This module defines the fundamental types shared across the workspace:
//! - `TileId`: stable identity of a renderable tile
//! - `AnimationId`: unique identifier for a tween instance
//! - `Placement` / `Dimensions` / `Visual`: a tile's visual state
//! - `AnimationState`: lifecycle of a tween

use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity of a renderable tile.
///
/// Tiles are created and destroyed by the host; this crate only ever reads
/// and writes their visual state, keyed by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile:{}", self.0)
    }
}

/// Unique identifier for a tween instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Current state of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Tween is actively running.
    Running,
    /// Tween has reached its end value.
    Finished,
    /// Tween was cancelled before completion.
    Cancelled,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::Running
    }
}

/// A tile's position, rotation and scale.
///
/// `x` and `y` are the coordinates of the tile's center. `rotation` is in
/// degrees, `scale` is a uniform factor applied around the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl Placement {
    pub fn new(x: f64, y: f64, rotation: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            rotation,
            scale,
        }
    }

    /// True if every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

/// Pixel dimensions of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True if both dimensions are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The complete visual state of a tile: placement plus pixel dimensions.
///
/// This is the unit the tween engine interpolates. Hosts that zoom by
/// scaling leave `size` constant; hosts that zoom by resizing animate it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Visual {
    #[serde(flatten)]
    pub placement: Placement,
    pub size: Dimensions,
}

impl Visual {
    pub fn new(placement: Placement, size: Dimensions) -> Self {
        Self { placement, size }
    }
}

assert_impl_all!(Visual: Copy, Send, Sync);
assert_impl_all!(TileId: Copy, Send, Sync);
