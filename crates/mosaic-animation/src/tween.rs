//! The tween engine: timed interpolation of tile visuals.
//!
//! This module provides:
//! - `TweenSpec`: configuration for a single tween (duration, easing)
//! - `ActiveTween`: runtime state of an in-progress tween
//! - `TweenEngine`: owner of all active tweens, advanced once per frame
//!
//! The engine enforces one tween per tile: starting a tween for a tile that
//! already has one replaces it. Cancellation is a normal control path, not an
//! error: `cancel` removes the tween and returns the visual it had reached
//! at the instant of cancellation, so callers can seamlessly chain a new
//! tween from that exact point.
//!
//! # Usage
//!
//! ```
//! use mosaic_animation::{Placement, Dimensions, TileId, TweenEngine, TweenSpec, Visual};
//! use mosaic_animation::easing::EasingFunction;
//!
//! let mut engine = TweenEngine::new();
//! let from = Visual::new(Placement::default(), Dimensions::new(100.0, 80.0));
//! let to = Visual::new(Placement::new(50.0, 50.0, 0.0, 2.0), Dimensions::new(100.0, 80.0));
//!
//! let spec = TweenSpec::new(100.0).with_easing(EasingFunction::Linear);
//! let id = engine.start(TileId(1), from, to, &spec);
//!
//! engine.advance(50.0);
//! let mid = engine.sample(id).unwrap();
//! assert!((mid.placement.x - 25.0).abs() < 0.01);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;
use crate::interpolate::Interpolate;
use crate::types::{AnimationId, AnimationState, TileId, Visual};

/// Configuration for a single tween.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweenSpec {
    /// Duration in milliseconds.
    pub duration_ms: f32,
    /// Easing function for the timing.
    pub easing: EasingFunction,
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            easing: EasingFunction::Ease,
        }
    }
}

impl TweenSpec {
    /// Create a spec with the given duration and default easing.
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    /// Set the easing function.
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }
}

/// Runtime state of a tween that is currently in progress.
#[derive(Debug, Clone)]
pub struct ActiveTween {
    /// Unique identifier for this tween.
    pub id: AnimationId,
    /// The tile this tween applies to.
    pub tile: TileId,
    /// Starting visual state.
    pub from: Visual,
    /// Target visual state.
    pub to: Visual,
    /// Total duration in milliseconds.
    pub duration_ms: f32,
    /// Time elapsed since the tween started, in milliseconds.
    pub elapsed_ms: f32,
    /// Easing function for timing.
    pub easing: EasingFunction,
    /// Current lifecycle state.
    pub state: AnimationState,
}

impl ActiveTween {
    fn new(tile: TileId, from: Visual, to: Visual, spec: &TweenSpec) -> Self {
        Self {
            id: AnimationId::new(),
            tile,
            from,
            to,
            duration_ms: spec.duration_ms,
            elapsed_ms: 0.0,
            easing: spec.easing,
            state: AnimationState::Running,
        }
    }

    /// Linear progress of this tween (0.0 to 1.0).
    pub fn progress(&self) -> f32 {
        if self.duration_ms > 0.0 {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// The interpolated visual at the tween's current progress.
    ///
    /// This reads the live value regardless of how far through the tween the
    /// tile is; it is what makes interruption seamless.
    pub fn current_visual(&self) -> Visual {
        match self.state {
            AnimationState::Finished => self.to,
            AnimationState::Running | AnimationState::Cancelled => {
                let eased = self.easing.evaluate(self.progress());
                self.from.interpolate(&self.to, eased)
            }
        }
    }

    /// Advance the tween. Returns `true` while it is still running.
    fn update(&mut self, delta_ms: f32) -> bool {
        if self.state != AnimationState::Running {
            return false;
        }
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.duration_ms {
            self.state = AnimationState::Finished;
            false
        } else {
            true
        }
    }

    /// Check if this tween is still running.
    pub fn is_active(&self) -> bool {
        self.state == AnimationState::Running
    }
}

/// Record of a tween that ran to completion during an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedTween {
    /// The tween that finished.
    pub id: AnimationId,
    /// The tile it applied to.
    pub tile: TileId,
    /// The end visual the tile reached.
    pub end: Visual,
}

/// Owner of all active tweens.
///
/// Single-threaded and frame-driven: the host calls [`TweenEngine::advance`]
/// once per frame and receives the tweens that finished during that step.
#[derive(Debug, Default)]
pub struct TweenEngine {
    /// Active tweens indexed by their ID.
    tweens: HashMap<AnimationId, ActiveTween>,
    /// Index from tile to its active tween. One tween per tile.
    tile_index: HashMap<TileId, AnimationId>,
}

impl TweenEngine {
    /// Create a new empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween for a tile.
    ///
    /// Any tween already running for the same tile is dropped; callers that
    /// want continuity sample it first and pass the sampled value as `from`.
    pub fn start(&mut self, tile: TileId, from: Visual, to: Visual, spec: &TweenSpec) -> AnimationId {
        if let Some(previous) = self.tile_index.remove(&tile) {
            self.tweens.remove(&previous);
        }

        let tween = ActiveTween::new(tile, from, to, spec);
        let id = tween.id;
        self.tweens.insert(id, tween);
        self.tile_index.insert(tile, id);
        id
    }

    /// Advance all tweens by `delta_ms` and collect the ones that finished.
    pub fn advance(&mut self, delta_ms: f32) -> Vec<CompletedTween> {
        let mut finished = Vec::new();
        for (id, tween) in self.tweens.iter_mut() {
            if !tween.update(delta_ms) {
                finished.push(*id);
            }
        }

        let mut completed = Vec::with_capacity(finished.len());
        for id in finished {
            if let Some(tween) = self.tweens.remove(&id) {
                self.tile_index.remove(&tween.tile);
                completed.push(CompletedTween {
                    id,
                    tile: tween.tile,
                    end: tween.to,
                });
            }
        }
        completed
    }

    /// Sample the current visual of a running tween.
    pub fn sample(&self, id: AnimationId) -> Option<Visual> {
        self.tweens.get(&id).map(ActiveTween::current_visual)
    }

    /// Sample the current visual of the tween running for a tile, if any.
    pub fn sample_tile(&self, tile: TileId) -> Option<Visual> {
        self.tile_index.get(&tile).and_then(|id| self.sample(*id))
    }

    /// Cancel a tween, returning the visual it had reached.
    ///
    /// The tween is removed immediately; it will not appear in a later
    /// `advance` result. Cancelling an unknown id returns `None`.
    pub fn cancel(&mut self, id: AnimationId) -> Option<Visual> {
        let mut tween = self.tweens.remove(&id)?;
        self.tile_index.remove(&tween.tile);
        tween.state = AnimationState::Cancelled;
        Some(tween.current_visual())
    }

    /// Cancel whatever tween is running for a tile.
    pub fn cancel_tile(&mut self, tile: TileId) -> Option<Visual> {
        let id = self.tile_index.get(&tile).copied()?;
        self.cancel(id)
    }

    /// Get a reference to an active tween by ID.
    pub fn tween(&self, id: AnimationId) -> Option<&ActiveTween> {
        self.tweens.get(&id)
    }

    /// The id of the tween running for a tile, if any.
    pub fn tween_for_tile(&self, tile: TileId) -> Option<AnimationId> {
        self.tile_index.get(&tile).copied()
    }

    /// Check whether a tween is still running.
    pub fn is_running(&self, id: AnimationId) -> bool {
        self.tweens.contains_key(&id)
    }

    /// Iterate over all active tweens.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveTween> {
        self.tweens.values()
    }

    /// Number of active tweens.
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// True when no tween is running.
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Drop every tween without producing completion records.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.tile_index.clear();
    }
}
