//! Error type for focus requests.
//!
//! Interruption by a newer request is not an error and never surfaces here;
//! these variants all fail fast, before the machine mutates any state, so a
//! rejected request leaves the machine exactly as it was.

use mosaic_animation::TileId;
use thiserror::Error;

/// A focus/unfocus request that could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FocusError {
    /// The container bounds enclose no area.
    #[error("container bounds enclose no area; width and height must be positive")]
    EmptyBounds,

    /// The container bounds contain NaN or infinite components.
    #[error("container bounds contain non-finite values")]
    NonFiniteBounds,

    /// The supplied resting layout cannot be animated.
    #[error("layout for {tile} has non-finite or non-positive components")]
    InvalidLayout { tile: TileId },

    /// The tile is not attached to the render surface, so no animation can
    /// be started for it.
    #[error("{tile} is not attached to the render surface")]
    DetachedTile { tile: TileId },
}
