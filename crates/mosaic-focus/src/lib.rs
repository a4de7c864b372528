//! Focus state machine for a scattered-tile gallery.
//!
//! A viewport shows many tiles at scattered resting placements. Clicking a
//! tile brings it into an enlarged, centered presentation; clicking again
//! (or anywhere else) returns it. This crate owns the hard part: deciding,
//! at any moment, which tile is focused, which tiles are mid-transition, and
//! how to reconcile a new request that arrives while animations are still in
//! flight: a second tile clicked while the first is animating in, a third
//! clicked during a cross-animation, or a cancel at any point. The visual
//! result always converges to a single consistent state with no duplicated,
//! stuck, or jumping tiles.
//!
//! # Architecture
//!
//! ```text
//! FocusMachine
//!   ├── TweenEngine (mosaic-animation): runs the transitions
//!   ├── RenderSurface: injected styling / z-order / placement side effects
//!   ├── Generation: monotonic counter invalidating superseded settlements
//!   └── EventQueue: lifecycle events drained by the host
//! ```
//!
//! The machine is single-threaded and frame-driven: `focus`/`unfocus` apply
//! their synchronous effects immediately, and the host calls `update` each
//! frame to advance animations and let the machine settle.

pub mod error;
pub mod events;
pub mod generation;
pub mod layout;
pub mod machine;
pub mod sampler;
pub mod surface;

pub use error::FocusError;
pub use events::{EventQueue, FocusEvent};
pub use generation::{FocusTicket, Generation};
pub use layout::{ContainerBounds, FocusFraming, OriginalLayout};
pub use machine::{FocusConfig, FocusMachine, FocusState};
pub use surface::{MemorySurface, RenderSurface, TileState};
