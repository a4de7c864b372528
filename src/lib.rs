//! Mosaic — a scattered-tile gallery with animated focus.
//!
//! The workspace is split into two crates:
//! - [`animation`] (`mosaic-animation`): the tween engine, easing functions
//!   and interpolation for tile visuals.
//! - [`focus`] (`mosaic-focus`): the focus state machine that brings one tile
//!   into an enlarged, centered presentation and back, and stays consistent
//!   under arbitrary interruption.
//!
//! This root crate only re-exports the members for convenience.

pub use mosaic_animation as animation;
pub use mosaic_focus as focus;

pub use mosaic_focus::{FocusMachine, FocusState};
