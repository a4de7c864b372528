//! Generation counter for interruption safety.
//!
//! Every accepted focus/unfocus request increments the machine's generation
//! and stamps the value on the work it starts. A deferred settlement (the
//! "the incoming tile has arrived, commit the stable focused state" step)
//! re-checks its stamped generation against the current one before applying;
//! a mismatch means a newer request already owns the outcome and the stale
//! settlement is abandoned silently. This replaces cancellation propagation
//! through the whole call chain.

use serde::{Deserialize, Serialize};

/// Monotonically increasing request counter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value stamped on the most recent accepted request.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Advance the counter and return the new value.
    pub fn next(&mut self) -> u64 {
        self.current += 1;
        self.current
    }
}

/// Handle to an accepted focus/unfocus request.
///
/// The request is resolved once the machine has settled into a stable state,
/// or once a newer request has superseded it (which resolves it harmlessly).
/// Poll with [`crate::FocusMachine::is_resolved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTicket {
    generation: u64,
}

impl FocusTicket {
    pub(crate) fn new(generation: u64) -> Self {
        Self { generation }
    }

    /// The generation this request was stamped with.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
