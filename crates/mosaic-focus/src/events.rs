//! Focus lifecycle events.
//!
//! The machine queues an event for every transition it starts or completes;
//! the host drains them after each frame to re-enable hover handlers, kick
//! off image loads for the focused tile, and so on.
//!
//! # Usage
//!
//! ```ignore
//! machine.update(16.7);
//! for event in machine.drain_events() {
//!     if let FocusEvent::Focused { tile, .. } = event {
//!         viewer.load_full_resolution(tile);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use mosaic_animation::TileId;

/// Event emitted by the focus machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FocusEvent {
    /// A tile started animating toward the focus presentation.
    FocusStarted { tile: TileId, generation: u64 },
    /// A tile reached the stable focused state.
    Focused { tile: TileId, generation: u64 },
    /// A tile started animating back to its resting layout.
    ReturnStarted { tile: TileId, generation: u64 },
    /// A tile was fully restored to its resting layout and styling.
    Returned { tile: TileId },
    /// The machine was reset; every involved tile was restored instantly.
    Reset,
}

impl FocusEvent {
    /// The tile this event concerns, if any.
    pub fn tile(&self) -> Option<TileId> {
        match self {
            Self::FocusStarted { tile, .. }
            | Self::Focused { tile, .. }
            | Self::ReturnStarted { tile, .. }
            | Self::Returned { tile } => Some(*tile),
            Self::Reset => None,
        }
    }
}

/// Queue collecting focus events between host polls.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<FocusEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event onto the queue.
    pub fn push(&mut self, event: FocusEvent) {
        self.events.push_back(event);
    }

    /// Pop the next event.
    pub fn pop(&mut self) -> Option<FocusEvent> {
        self.events.pop_front()
    }

    /// Drain all pending events in order.
    pub fn drain(&mut self) -> impl Iterator<Item = FocusEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events concerning a specific tile.
    pub fn events_for_tile(&self, tile: TileId) -> Vec<FocusEvent> {
        self.events
            .iter()
            .filter(|event| event.tile() == Some(tile))
            .copied()
            .collect()
    }
}
