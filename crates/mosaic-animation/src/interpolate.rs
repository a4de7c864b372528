//! Interpolation for tile visual state.
//!
//! The `Interpolate` trait is the core mechanism behind smooth tweens: every
//! component of a [`Visual`] is interpolated independently. Rotation is
//! interpolated as plain degrees; focus transitions always target a concrete
//! angle, so no shortest-arc handling is needed.

use crate::types::{Dimensions, Placement, Visual};

/// Trait for types that can be interpolated between two values.
pub trait Interpolate: Sized {
    /// Interpolate between self and `to` at factor `t`.
    ///
    /// When t = 0.0, returns self. When t = 1.0, returns `to`.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp(from: f64, to: f64, t: f32) -> f64 {
    from + (to - from) * t as f64
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Placement {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            rotation: lerp(self.rotation, to.rotation, t),
            scale: lerp(self.scale, to.scale, t),
        }
    }
}

impl Interpolate for Dimensions {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
        }
    }
}

impl Interpolate for Visual {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            placement: self.placement.interpolate(&to.placement, t),
            size: self.size.interpolate(&to.size, t),
        }
    }
}
