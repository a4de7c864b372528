//! The render surface: injected styling and placement side effects.
//!
//! Applying classes, z-order and inline placement is inherently global
//! mutable state tied to a rendering backend, so it sits behind the
//! [`RenderSurface`] trait and the focus machine itself stays testable in
//! isolation. [`MemorySurface`] is a complete in-memory implementation used
//! by the test suite and by headless hosts.

use std::collections::HashMap;

use mosaic_animation::{TileId, Visual};

/// Side-effect sink for tile visuals, stacking order and focused styling.
///
/// All methods are infallible. The one failure mode a backend can report, a
/// tile that no longer exists, is surfaced through
/// [`RenderSurface::contains`], which the machine checks before starting any
/// work for a tile.
pub trait RenderSurface {
    /// Whether the tile is currently attached to the surface.
    fn contains(&self, tile: TileId) -> bool;

    /// The tile's current static visual, if attached.
    fn visual(&self, tile: TileId) -> Option<Visual>;

    /// Commit a static visual for the tile.
    fn set_visual(&mut self, tile: TileId, visual: Visual);

    /// The tile's current stacking order (0 if unknown).
    fn z_index(&self, tile: TileId) -> i32;

    /// Set the tile's stacking order.
    fn set_z_index(&mut self, tile: TileId, z_index: i32);

    /// Apply the focused styling class to the tile.
    fn apply_focused_style(&mut self, tile: TileId);

    /// Remove the focused styling class from the tile.
    fn remove_focused_style(&mut self, tile: TileId);

    /// Whether the tile currently carries the focused styling class.
    fn has_focused_style(&self, tile: TileId) -> bool;
}

/// Visual state of one tile on a [`MemorySurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileState {
    pub visual: Visual,
    pub z_index: i32,
    pub focused_style: bool,
}

/// In-memory render surface.
#[derive(Debug, Default)]
pub struct MemorySurface {
    tiles: HashMap<TileId, TileState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tile with an initial visual and stacking order.
    pub fn insert(&mut self, tile: TileId, visual: Visual, z_index: i32) {
        self.tiles.insert(
            tile,
            TileState {
                visual,
                z_index,
                focused_style: false,
            },
        );
    }

    /// Detach a tile.
    pub fn remove(&mut self, tile: TileId) -> Option<TileState> {
        self.tiles.remove(&tile)
    }

    /// Full state of a tile, for assertions and snapshots.
    pub fn state(&self, tile: TileId) -> Option<&TileState> {
        self.tiles.get(&tile)
    }

    /// Number of attached tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl RenderSurface for MemorySurface {
    fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains_key(&tile)
    }

    fn visual(&self, tile: TileId) -> Option<Visual> {
        self.tiles.get(&tile).map(|state| state.visual)
    }

    fn set_visual(&mut self, tile: TileId, visual: Visual) {
        if let Some(state) = self.tiles.get_mut(&tile) {
            state.visual = visual;
        }
    }

    fn z_index(&self, tile: TileId) -> i32 {
        self.tiles.get(&tile).map(|state| state.z_index).unwrap_or(0)
    }

    fn set_z_index(&mut self, tile: TileId, z_index: i32) {
        if let Some(state) = self.tiles.get_mut(&tile) {
            state.z_index = z_index;
        }
    }

    fn apply_focused_style(&mut self, tile: TileId) {
        if let Some(state) = self.tiles.get_mut(&tile) {
            state.focused_style = true;
        }
    }

    fn remove_focused_style(&mut self, tile: TileId) {
        if let Some(state) = self.tiles.get_mut(&tile) {
            state.focused_style = false;
        }
    }

    fn has_focused_style(&self, tile: TileId) -> bool {
        self.tiles
            .get(&tile)
            .map(|state| state.focused_style)
            .unwrap_or(false)
    }
}
