//! The focus state machine.
//!
//! Owns the focused slot (at most one occupant) and the animating role pair
//! (at most one tile arriving at focus, tiles returning to rest), and
//! reconciles every request that arrives while transitions are in flight.
//!
//! # Transition summary
//!
//! ```text
//! IDLE          --focus(T)--> FOCUSING(T)                  --> FOCUSED(T)
//! FOCUSED(A)    --focus(A)--> UNFOCUSING(A)                --> IDLE
//! FOCUSED(A)    --focus(T)--> CROSS(out=A, in=T)           --> FOCUSED(T)
//! FOCUSING(T)   --focus(T)--> UNFOCUSING(T)   (reversed from sampled point)
//! FOCUSING(T)   --focus(U)--> FOCUSING(U)     (T snapped to rest instantly)
//! UNFOCUSING(A) --focus(T)--> CROSS(out=A, in=T)
//! CROSS(A, B)   --focus(B)--> no-op
//! CROSS(A, B)   --focus(A)--> CROSS(out=B, in=A)  (both from sampled points)
//! CROSS(A, B)   --focus(C)--> CROSS(out=B, in=C)  (A snapped to rest instantly)
//! any           --unfocus()-> everything animates back     --> IDLE
//! any           --reset()---> IDLE, instantly
//! ```
//!
//! The asymmetry in the third-target row is deliberate: the old outgoing
//! tile already used the pair's transition slot, so it is reset without a
//! transition while the old incoming tile is redirected with one. This
//! avoids animation queue buildup under rapid clicking.
//!
//! Interruption safety rests on two mechanisms, both applied in
//! [`FocusMachine::update`]: completions are routed by animation id, and a
//! superseding request rewrites the role slots synchronously, so a stale
//! completion finds no slot and is dropped; and the final commit into the
//! stable focused state additionally re-checks the request's
//! [`Generation`](crate::Generation) stamp against the machine's current one.

use std::collections::HashMap;

use mosaic_animation::{CompletedTween, EasingFunction, TileId, TweenEngine, TweenSpec, Visual};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::FocusError;
use crate::events::{EventQueue, FocusEvent};
use crate::generation::{FocusTicket, Generation};
use crate::layout::{self, ContainerBounds, FocusFraming, OriginalLayout};
use crate::sampler;
use crate::surface::RenderSurface;

/// Public state of the focus machine.
///
/// `Idle` and `Focused` are the stable states; the others are transient and
/// always resolve to a stable state (or to another transient state when
/// interrupted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusState {
    /// No tile focused, nothing animating.
    Idle,
    /// One tile animating toward the focus presentation.
    Focusing,
    /// One tile stably focused, nothing animating.
    Focused,
    /// One or two tiles animating back to rest.
    Unfocusing,
    /// One tile animating out while another animates in.
    CrossAnimating,
}

/// Configuration for the focus machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Duration and easing used by every focus/return transition.
    pub tween: TweenSpec,
    /// Geometry of the focus presentation.
    pub framing: FocusFraming,
    /// Stacking order of the stable focused tile.
    pub z_focused: i32,
    /// Stacking order of the tile animating toward focus.
    pub z_incoming: i32,
    /// Stacking order of tiles animating back to rest.
    pub z_outgoing: i32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            tween: TweenSpec::new(300.0).with_easing(EasingFunction::EaseInOut),
            framing: FocusFraming::default(),
            z_focused: 1000,
            z_incoming: 900,
            z_outgoing: 800,
        }
    }
}

/// Per-tile bookkeeping, alive from the moment a focus transition begins
/// until the tile is restored to rest (or replaced wholesale by `reset`).
#[derive(Debug, Clone, Copy)]
struct FocusSession {
    /// The resting state to restore, captured when the tile first entered
    /// the machine. Holds the saved z-order and dimensions.
    origin: OriginalLayout,
    /// The focus presentation this tile is (or was) heading for.
    focus_visual: Visual,
}

/// One occupied animation role: a tile and the tween moving it.
///
/// `anim` is `None` once the tween has finished and the tile is holding at
/// its endpoint, waiting for the other role to drain.
#[derive(Debug, Clone, Copy)]
struct Lane {
    tile: TileId,
    anim: Option<mosaic_animation::AnimationId>,
    generation: u64,
}

/// The focus/cross-animation state machine.
///
/// Generic over the [`RenderSurface`] so the transition logic can be tested
/// against an in-memory surface and deployed against a real backend.
#[derive(Debug)]
pub struct FocusMachine<S> {
    surface: S,
    engine: TweenEngine,
    config: FocusConfig,
    generation: Generation,
    /// The stable focused slot. Never occupied while a tile is arriving.
    focused: Option<TileId>,
    /// The tile animating toward focus, if any.
    arriving: Option<Lane>,
    /// Tiles animating back to rest. At most two, and two only in the
    /// window after an unfocus interrupted a cross-animation.
    returning: Vec<Lane>,
    sessions: HashMap<TileId, FocusSession>,
    events: EventQueue,
}

impl<S: RenderSurface> FocusMachine<S> {
    /// Create a machine over the given surface with default configuration.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, FocusConfig::default())
    }

    /// Create a machine with explicit configuration.
    pub fn with_config(surface: S, config: FocusConfig) -> Self {
        Self {
            surface,
            engine: TweenEngine::new(),
            config,
            generation: Generation::new(),
            focused: None,
            arriving: None,
            returning: Vec::new(),
            sessions: HashMap::new(),
            events: EventQueue::new(),
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Request that `tile` become the focused tile.
    ///
    /// If `tile` is already stably focused this toggles it back off. If it
    /// is currently animating toward focus, the request cancels that focus
    /// in progress and reverses it from the exact sampled point. All other
    /// situations follow the transition table in the module docs.
    ///
    /// The returned ticket resolves when the machine settles, or resolves
    /// harmlessly if a newer request supersedes this one.
    pub fn focus(
        &mut self,
        tile: TileId,
        bounds: ContainerBounds,
        original: OriginalLayout,
    ) -> Result<FocusTicket, FocusError> {
        // Fail fast, before any state is touched
        if !bounds.is_finite() {
            return Err(FocusError::NonFiniteBounds);
        }
        if !bounds.has_area() {
            return Err(FocusError::EmptyBounds);
        }
        if !original.is_valid() {
            return Err(FocusError::InvalidLayout { tile });
        }
        if !self.surface.contains(tile) {
            return Err(FocusError::DetachedTile { tile });
        }

        // Idempotent special cases; neither consumes a generation.
        if self.focused == Some(tile) {
            // Second click toggles off
            return Ok(self.unfocus());
        }
        let was_cross = self.arriving.is_some() && !self.returning.is_empty();
        if was_cross {
            if let Some(lane) = &self.arriving {
                if lane.tile == tile {
                    trace!(%tile, "focus request for the committed incoming tile; no-op");
                    return Ok(FocusTicket::new(lane.generation));
                }
            }
        }

        let generation = self.generation.next();
        debug!(%tile, generation, state = ?self.state(), "focus request accepted");

        // focus(T) while T itself is animating in cancels the focus in
        // progress: reverse from the sampled mid-flight visual
        if !was_cross {
            if let Some(lane) = self.arriving.take_if(|lane| lane.tile == tile) {
                self.redirect_to_rest(lane, generation);
                return Ok(FocusTicket::new(generation));
            }
        }

        // Target currently animating out: reclaim its exact mid-flight
        // visual so the new arrival continues from there without a snap
        let resume_from = if let Some(pos) = self.returning.iter().position(|lane| lane.tile == tile) {
            let lane = self.returning.remove(pos);
            lane.anim
                .and_then(|anim| sampler::freeze(&mut self.engine, &mut self.surface, anim))
                .or_else(|| self.sessions.get(&tile).map(|s| s.origin.visual()))
        } else {
            None
        };

        // Resolve the previous incoming tile
        if let Some(lane) = self.arriving.take() {
            if was_cross {
                // The old outgoing tile already used the pair's transition
                // slot: reset it instantly. The old incoming tile keeps a
                // transition, redirected into the outgoing role.
                for stale in std::mem::take(&mut self.returning) {
                    self.snap_to_rest(stale);
                }
                self.redirect_to_rest(lane, generation);
            } else {
                // Plain FOCUSING interrupted by a different tile
                self.snap_to_rest(lane);
            }
        }

        // A stable focused tile gives up the slot with a full transition
        if let Some(previous) = self.focused.take() {
            let from = self
                .sessions
                .get(&previous)
                .map(|s| s.focus_visual)
                .or_else(|| self.surface.visual(previous));
            if let Some(from) = from {
                self.begin_return(previous, from, generation);
            }
        }

        // At most two tiles animate concurrently; make room for the arrival
        while self.returning.len() >= 2 {
            let stale = self.returning.remove(0);
            self.snap_to_rest(stale);
        }

        debug_assert!(self.focused.is_none() && self.arriving.is_none());
        self.begin_arrival(tile, &bounds, original, resume_from, generation);
        Ok(FocusTicket::new(generation))
    }

    /// Alias for [`FocusMachine::focus`], for call sites that read better as
    /// a swap ("replace whatever is focused with this tile").
    pub fn swap_focus(
        &mut self,
        tile: TileId,
        bounds: ContainerBounds,
        original: OriginalLayout,
    ) -> Result<FocusTicket, FocusError> {
        self.focus(tile, bounds, original)
    }

    /// Return whatever is focused or arriving back to rest.
    ///
    /// Ignored while the machine is already idle or unfocusing.
    pub fn unfocus(&mut self) -> FocusTicket {
        if self.focused.is_none() && self.arriving.is_none() {
            // Idle, or already unfocusing
            return FocusTicket::new(self.generation.current());
        }

        let generation = self.generation.next();
        debug!(generation, state = ?self.state(), "unfocus request accepted");

        if let Some(tile) = self.focused.take() {
            let from = self
                .sessions
                .get(&tile)
                .map(|s| s.focus_visual)
                .or_else(|| self.surface.visual(tile));
            if let Some(from) = from {
                self.begin_return(tile, from, generation);
            }
        }
        if let Some(lane) = self.arriving.take() {
            // The outgoing lane of a cross-animation keeps running; the
            // arriving tile is redirected home from its sampled point
            self.redirect_to_rest(lane, generation);
        }
        FocusTicket::new(generation)
    }

    /// Tear everything down synchronously: cancel all animations, restore
    /// every involved tile to its resting layout, land in `Idle`.
    pub fn reset(&mut self) {
        debug!(state = ?self.state(), "reset");
        self.engine.clear();
        self.arriving = None;
        self.returning.clear();
        self.focused = None;

        let involved: Vec<TileId> = self.sessions.keys().copied().collect();
        for tile in involved {
            self.restore(tile);
        }

        // Strand any settlement a stale ticket might still observe
        self.generation.next();
        self.events.push(FocusEvent::Reset);
    }

    // ========================================================================
    // Frame driving
    // ========================================================================

    /// Advance all animations by `delta_ms` and apply any settlements that
    /// became due. Call once per frame.
    pub fn update(&mut self, delta_ms: f32) {
        let completed = self.engine.advance(delta_ms);

        // Keep the surface's committed state tracking the live tween values
        let live: Vec<(TileId, Visual)> = self
            .engine
            .iter()
            .map(|tween| (tween.tile, tween.current_visual()))
            .collect();
        for (tile, visual) in live {
            self.surface.set_visual(tile, visual);
        }

        for done in completed {
            self.on_tween_complete(done);
        }
    }

    /// Drain the lifecycle events queued since the last poll.
    pub fn drain_events(&mut self) -> impl Iterator<Item = FocusEvent> + '_ {
        self.events.drain()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current public state, derived from the role slots.
    pub fn state(&self) -> FocusState {
        match (&self.arriving, self.returning.is_empty(), self.focused) {
            (Some(_), false, _) => FocusState::CrossAnimating,
            (Some(_), true, _) => FocusState::Focusing,
            (None, false, _) => FocusState::Unfocusing,
            (None, true, Some(_)) => FocusState::Focused,
            (None, true, None) => FocusState::Idle,
        }
    }

    /// The stably focused tile, if any.
    pub fn focused_tile(&self) -> Option<TileId> {
        self.focused
    }

    /// Whether `tile` is the stably focused tile.
    pub fn is_focused(&self, tile: TileId) -> bool {
        self.focused == Some(tile)
    }

    /// Whether any transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.arriving.is_some() || !self.returning.is_empty()
    }

    /// Whether `tile` is focused, arriving, or returning. Hosts use this to
    /// suppress hover effects that would fight the transition.
    pub fn is_involved(&self, tile: TileId) -> bool {
        self.focused == Some(tile)
            || self.arriving.as_ref().is_some_and(|lane| lane.tile == tile)
            || self.returning.iter().any(|lane| lane.tile == tile)
    }

    /// The generation stamped on the most recent accepted request.
    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    /// Whether a request has run to completion or been superseded.
    pub fn is_resolved(&self, ticket: FocusTicket) -> bool {
        ticket.generation() != self.generation.current() || !self.is_animating()
    }

    /// The underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the underlying surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The tween engine, for hosts that render interpolated values directly.
    pub fn engine(&self) -> &TweenEngine {
        &self.engine
    }

    /// The active configuration.
    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    // ========================================================================
    // Transition helpers
    // ========================================================================

    /// Start `tile` animating toward the focus presentation.
    fn begin_arrival(
        &mut self,
        tile: TileId,
        bounds: &ContainerBounds,
        original: OriginalLayout,
        resume_from: Option<Visual>,
        generation: u64,
    ) {
        let target = layout::focus_visual(bounds, &original, &self.config.framing);

        // First-seen origin wins: a tile re-focused mid-return must restore
        // to its true resting layout, not to wherever it was re-offered
        let session = self.sessions.entry(tile).or_insert(FocusSession {
            origin: original,
            focus_visual: target,
        });
        session.focus_visual = target;
        let origin_visual = session.origin.visual();

        let from = resume_from.unwrap_or(origin_visual);
        self.surface.apply_focused_style(tile);
        self.surface.set_z_index(tile, self.config.z_incoming);
        let anim = self.engine.start(tile, from, target, &self.config.tween);
        self.arriving = Some(Lane {
            tile,
            anim: Some(anim),
            generation,
        });
        self.events.push(FocusEvent::FocusStarted { tile, generation });
    }

    /// Start `tile` animating from `from` back to its resting layout.
    fn begin_return(&mut self, tile: TileId, from: Visual, generation: u64) {
        let Some(origin_visual) = self.sessions.get(&tile).map(|s| s.origin.visual()) else {
            warn!(%tile, "no session for tile leaving focus; dropping return");
            return;
        };
        self.surface.set_z_index(tile, self.config.z_outgoing);
        let anim = self.engine.start(tile, from, origin_visual, &self.config.tween);
        self.returning.push(Lane {
            tile,
            anim: Some(anim),
            generation,
        });
        self.events.push(FocusEvent::ReturnStarted { tile, generation });
    }

    /// Redirect an arriving lane into the outgoing role, continuing from its
    /// sampled mid-flight visual.
    fn redirect_to_rest(&mut self, lane: Lane, generation: u64) {
        let sampled = lane
            .anim
            .and_then(|anim| sampler::freeze(&mut self.engine, &mut self.surface, anim))
            // Lane already arrived and is holding at the focus presentation
            .or_else(|| self.sessions.get(&lane.tile).map(|s| s.focus_visual));
        match sampled {
            Some(from) => self.begin_return(lane.tile, from, generation),
            None => self.restore(lane.tile),
        }
    }

    /// Cancel a lane's tween and restore its tile instantly, no transition.
    fn snap_to_rest(&mut self, lane: Lane) {
        if let Some(anim) = lane.anim {
            self.engine.cancel(anim);
        }
        self.restore(lane.tile);
    }

    /// Put a tile back exactly as its session recorded it and end the
    /// session. This is the single restoration path, so the round-trip is
    /// bit-for-bit: placement, dimensions, z-order, styling.
    fn restore(&mut self, tile: TileId) {
        if let Some(session) = self.sessions.remove(&tile) {
            self.surface.set_visual(tile, session.origin.visual());
            self.surface.set_z_index(tile, session.origin.z_index);
            self.surface.remove_focused_style(tile);
            self.events.push(FocusEvent::Returned { tile });
        }
    }

    /// Route one tween completion to the lane that owns it. Completions for
    /// superseded tweens find no lane and are dropped silently.
    fn on_tween_complete(&mut self, done: CompletedTween) {
        if let Some(pos) = self.returning.iter().position(|lane| lane.anim == Some(done.id)) {
            let lane = self.returning.remove(pos);
            trace!(tile = %lane.tile, generation = lane.generation, "return completed");
            self.restore(lane.tile);
            self.try_settle();
            return;
        }

        if self.arriving.as_ref().is_some_and(|lane| lane.anim == Some(done.id)) {
            if let Some(lane) = self.arriving.as_mut() {
                lane.anim = None;
            }
            self.surface.set_visual(done.tile, done.end);
            self.try_settle();
            return;
        }

        trace!(tile = %done.tile, "completion for a superseded tween; ignored");
    }

    /// Commit the stable focused state once the arriving tile has landed and
    /// every returning tile has drained, and only if no newer request has
    /// claimed the outcome since.
    fn try_settle(&mut self) {
        let Some(lane) = self.arriving else { return };
        if lane.anim.is_some() || !self.returning.is_empty() {
            return;
        }
        if lane.generation != self.generation.current() {
            trace!(
                stamped = lane.generation,
                current = self.generation.current(),
                "stale settlement abandoned"
            );
            return;
        }

        self.arriving = None;
        if let Some(session) = self.sessions.get(&lane.tile) {
            self.surface.set_visual(lane.tile, session.focus_visual);
        }
        self.surface.set_z_index(lane.tile, self.config.z_focused);
        self.focused = Some(lane.tile);
        debug!(tile = %lane.tile, "settled into stable focus");
        self.events.push(FocusEvent::Focused {
            tile: lane.tile,
            generation: lane.generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn tile_layout(i: u64) -> OriginalLayout {
        OriginalLayout {
            x: 100.0 * i as f64,
            y: 60.0 * i as f64,
            rotation: 3.0 * i as f64 - 6.0,
            scale: 1.0,
            z_index: i as i32,
            width: 200.0,
            height: 150.0,
        }
    }

    fn bounds() -> ContainerBounds {
        ContainerBounds::new(0.0, 0.0, 1280.0, 800.0)
    }

    /// Machine over `n` tiles with a 100ms linear tween for exact math.
    fn machine(n: u64) -> FocusMachine<MemorySurface> {
        let mut surface = MemorySurface::new();
        for i in 1..=n {
            surface.insert(TileId(i), tile_layout(i).visual(), tile_layout(i).z_index);
        }
        let config = FocusConfig {
            tween: TweenSpec::new(100.0).with_easing(EasingFunction::Linear),
            ..FocusConfig::default()
        };
        FocusMachine::with_config(surface, config)
    }

    fn settle(machine: &mut FocusMachine<MemorySurface>) {
        for _ in 0..64 {
            if !machine.is_animating() {
                return;
            }
            machine.update(16.0);
        }
        panic!("machine failed to settle");
    }

    fn assert_at_rest(machine: &FocusMachine<MemorySurface>, i: u64) {
        let state = machine.surface().state(TileId(i)).unwrap();
        let layout = tile_layout(i);
        assert_eq!(state.visual, layout.visual(), "tile {i} visual not restored");
        assert_eq!(state.z_index, layout.z_index, "tile {i} z-order not restored");
        assert!(!state.focused_style, "tile {i} styling not removed");
    }

    #[test]
    fn test_focus_reaches_stable_focused() {
        let mut m = machine(3);
        let ticket = m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();

        assert_eq!(m.state(), FocusState::Focusing);
        assert!(m.is_animating());
        assert!(!m.is_resolved(ticket));

        settle(&mut m);
        assert_eq!(m.state(), FocusState::Focused);
        assert!(m.is_focused(TileId(1)));
        assert!(m.is_resolved(ticket));

        let state = m.surface().state(TileId(1)).unwrap();
        let expected = layout::focus_visual(&bounds(), &tile_layout(1), &m.config().framing);
        assert_eq!(state.visual, expected);
        assert_eq!(state.z_index, m.config().z_focused);
        assert!(state.focused_style);
    }

    #[test]
    fn test_second_click_toggles_off() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);

        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        assert_eq!(m.state(), FocusState::Unfocusing);

        settle(&mut m);
        assert_eq!(m.state(), FocusState::Idle);
        assert!(!m.is_focused(TileId(1)));
        assert_at_rest(&m, 1);
    }

    #[test]
    fn test_swap_focus_cross_animates() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);

        m.swap_focus(TileId(2), bounds(), tile_layout(2)).unwrap();
        assert_eq!(m.state(), FocusState::CrossAnimating);
        assert!(m.is_involved(TileId(1)));
        assert!(m.is_involved(TileId(2)));
        assert!(!m.is_involved(TileId(3)));

        settle(&mut m);
        assert_eq!(m.state(), FocusState::Focused);
        assert!(m.is_focused(TileId(2)));
        assert!(!m.is_focused(TileId(1)));
        assert_at_rest(&m, 1);
    }

    #[test]
    fn test_unfocus_mid_focus_never_reaches_focus() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        m.update(40.0);

        let focus_scale = layout::focus_visual(&bounds(), &tile_layout(1), &m.config().framing)
            .placement
            .scale;

        m.unfocus();
        assert_eq!(m.state(), FocusState::Unfocusing);

        // The reversal starts from the sampled mid-flight visual
        let sampled = m.surface().state(TileId(1)).unwrap().visual;
        assert!(sampled.placement.scale > 1.0);
        assert!(sampled.placement.scale < focus_scale);

        settle(&mut m);
        assert_eq!(m.state(), FocusState::Idle);
        assert_at_rest(&m, 1);
    }

    #[test]
    fn test_third_tile_during_cross() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();
        m.update(30.0);
        assert_eq!(m.state(), FocusState::CrossAnimating);

        m.focus(TileId(3), bounds(), tile_layout(3)).unwrap();

        // The old outgoing tile is reset instantly, no transition
        assert_at_rest(&m, 1);
        // The old incoming tile is redirected out; the new target arrives
        assert_eq!(m.state(), FocusState::CrossAnimating);
        assert!(m.is_involved(TileId(2)));
        assert!(m.is_involved(TileId(3)));

        settle(&mut m);
        assert_eq!(m.state(), FocusState::Focused);
        assert!(m.is_focused(TileId(3)));
        assert_at_rest(&m, 1);
        assert_at_rest(&m, 2);
    }

    #[test]
    fn test_cross_swap_back_to_outgoing_tile() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();
        m.update(30.0);

        // Click the tile that is currently animating out: roles swap
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        assert_eq!(m.state(), FocusState::CrossAnimating);

        // Tile 1 resumes from its sampled mid-return visual, not from rest
        let arriving = m.engine().tween_for_tile(TileId(1)).unwrap();
        let from = m.engine().tween(arriving).unwrap().from;
        assert_ne!(from, tile_layout(1).visual());

        settle(&mut m);
        assert!(m.is_focused(TileId(1)));
        assert_at_rest(&m, 2);
    }

    #[test]
    fn test_cross_focus_on_incoming_tile_is_noop() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        let first = m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();
        m.update(30.0);

        let generation_before = m.generation();
        let second = m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();

        assert_eq!(second, first);
        assert_eq!(m.generation(), generation_before);
        assert_eq!(m.state(), FocusState::CrossAnimating);

        settle(&mut m);
        assert!(m.is_focused(TileId(2)));
    }

    #[test]
    fn test_focusing_interrupted_by_second_tile_snaps_first() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        m.update(30.0);

        m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();

        // Tile 1 is dropped instantly to rest; tile 2 starts fresh
        assert_at_rest(&m, 1);
        assert_eq!(m.state(), FocusState::Focusing);

        settle(&mut m);
        assert!(m.is_focused(TileId(2)));
    }

    #[test]
    fn test_focus_while_focusing_same_tile_reverses() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        m.update(30.0);

        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        assert_eq!(m.state(), FocusState::Unfocusing);

        settle(&mut m);
        assert_eq!(m.state(), FocusState::Idle);
        assert_at_rest(&m, 1);
    }

    #[test]
    fn test_unfocus_during_cross_returns_both() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();
        m.update(30.0);

        m.unfocus();
        assert_eq!(m.state(), FocusState::Unfocusing);
        assert_eq!(m.engine().active_count(), 2);

        settle(&mut m);
        assert_eq!(m.state(), FocusState::Idle);
        assert_at_rest(&m, 1);
        assert_at_rest(&m, 2);
    }

    #[test]
    fn test_unfocus_when_idle_is_noop() {
        let mut m = machine(3);
        let generation_before = m.generation();
        let ticket = m.unfocus();

        assert_eq!(m.generation(), generation_before);
        assert_eq!(m.state(), FocusState::Idle);
        assert!(m.is_resolved(ticket));
    }

    #[test]
    fn test_unfocus_while_unfocusing_is_ignored() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.unfocus();
        let generation_before = m.generation();

        m.unfocus();
        assert_eq!(m.generation(), generation_before);
        assert_eq!(m.state(), FocusState::Unfocusing);

        settle(&mut m);
        assert_eq!(m.state(), FocusState::Idle);
    }

    #[test]
    fn test_round_trip_restores_exact_state() {
        let mut m = machine(3);
        let before = *m.surface().state(TileId(1)).unwrap();

        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.unfocus();
        settle(&mut m);

        let after = *m.surface().state(TileId(1)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_generation_increments_once_per_accepted_call() {
        let mut m = machine(3);
        assert_eq!(m.generation(), 0);

        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        assert_eq!(m.generation(), 1);

        m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();
        assert_eq!(m.generation(), 2);

        m.unfocus();
        assert_eq!(m.generation(), 3);

        // Rejected and idempotent calls do not consume a generation
        assert!(m.focus(TileId(9), bounds(), tile_layout(9)).is_err());
        m.unfocus();
        assert_eq!(m.generation(), 3);
    }

    #[test]
    fn test_invalid_arguments_fail_fast() {
        let mut m = machine(3);

        let err = m
            .focus(TileId(1), ContainerBounds::new(0.0, 0.0, 0.0, 800.0), tile_layout(1))
            .unwrap_err();
        assert_eq!(err, FocusError::EmptyBounds);

        let err = m
            .focus(
                TileId(1),
                ContainerBounds::new(f64::NAN, 0.0, 100.0, 100.0),
                tile_layout(1),
            )
            .unwrap_err();
        assert_eq!(err, FocusError::NonFiniteBounds);

        let mut bad = tile_layout(1);
        bad.scale = f64::NAN;
        let err = m.focus(TileId(1), bounds(), bad).unwrap_err();
        assert_eq!(err, FocusError::InvalidLayout { tile: TileId(1) });

        let err = m.focus(TileId(99), bounds(), tile_layout(99)).unwrap_err();
        assert_eq!(err, FocusError::DetachedTile { tile: TileId(99) });

        // The machine is untouched by rejected requests
        assert_eq!(m.state(), FocusState::Idle);
        assert_eq!(m.generation(), 0);
        assert!(!m.is_animating());
    }

    #[test]
    fn test_z_order_during_cross_animation() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();

        // Outgoing below incoming, both below the stable focused order
        let z_out = m.surface().z_index(TileId(1));
        let z_in = m.surface().z_index(TileId(2));
        assert_eq!(z_out, m.config().z_outgoing);
        assert_eq!(z_in, m.config().z_incoming);
        assert!(z_out < z_in);
        assert!(z_in < m.config().z_focused);

        settle(&mut m);
        assert_eq!(m.surface().z_index(TileId(2)), m.config().z_focused);
    }

    #[test]
    fn test_reset_is_synchronous_and_total() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();
        m.update(30.0);
        m.focus(TileId(3), bounds(), tile_layout(3)).unwrap();

        m.reset();
        assert_eq!(m.state(), FocusState::Idle);
        assert!(!m.is_animating());
        assert!(m.engine().is_idle());
        for i in 1..=3 {
            assert_at_rest(&m, i);
        }

        // A second reset is harmless
        m.reset();
        assert_eq!(m.state(), FocusState::Idle);
    }

    #[test]
    fn test_surface_tracks_live_values_mid_animation() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        m.update(50.0);

        let rest = tile_layout(1).visual();
        let target = layout::focus_visual(&bounds(), &tile_layout(1), &m.config().framing);
        let live = m.surface().state(TileId(1)).unwrap().visual;

        assert_ne!(live, rest);
        assert_ne!(live, target);
        assert!((live.placement.x - (rest.placement.x + target.placement.x) / 2.0).abs() < 0.5);
    }

    #[test]
    fn test_events_emitted_in_order() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.unfocus();
        settle(&mut m);

        let events: Vec<_> = m.drain_events().collect();
        assert!(matches!(
            events[0],
            FocusEvent::FocusStarted { tile: TileId(1), .. }
        ));
        assert!(matches!(events[1], FocusEvent::Focused { tile: TileId(1), .. }));
        assert!(matches!(
            events[2],
            FocusEvent::ReturnStarted { tile: TileId(1), .. }
        ));
        assert!(matches!(events[3], FocusEvent::Returned { tile: TileId(1) }));
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_superseded_ticket_resolves_harmlessly() {
        let mut m = machine(3);
        let first = m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        m.update(30.0);
        let second = m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();

        // The superseded request is resolved even though animation continues
        assert!(m.is_resolved(first));
        assert!(!m.is_resolved(second));

        settle(&mut m);
        assert!(m.is_resolved(second));
        assert!(m.is_focused(TileId(2)));
    }

    #[test]
    fn test_rapid_click_storm_converges() {
        let mut m = machine(4);

        // Arbitrary interleaving of requests and partial frames
        let clicks = [1_u64, 2, 3, 3, 2, 4, 1, 1, 4, 2];
        for (step, &i) in clicks.iter().enumerate() {
            m.focus(TileId(i), bounds(), tile_layout(i)).unwrap();
            if step % 3 == 0 {
                m.unfocus();
            }
            m.update(20.0);

            // Invariants hold at every observed instant
            assert!(m.engine().active_count() <= 2, "more than two tiles animating");
            assert!(m.focused_tile().iter().count() <= 1);
        }

        settle(&mut m);
        let state = m.state();
        assert!(
            state == FocusState::Idle || state == FocusState::Focused,
            "did not converge to a stable state: {state:?}"
        );

        // Every tile is either the focused one or exactly at rest
        for i in 1..=4 {
            if m.is_focused(TileId(i)) {
                let expected =
                    layout::focus_visual(&bounds(), &tile_layout(i), &m.config().framing);
                assert_eq!(m.surface().state(TileId(i)).unwrap().visual, expected);
            } else {
                assert_at_rest(&m, i);
            }
        }
    }

    #[test]
    fn test_focus_during_double_unfocus_makes_room() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.focus(TileId(2), bounds(), tile_layout(2)).unwrap();
        m.update(30.0);
        m.unfocus();

        // Two tiles are now returning; a new focus must not make it three
        m.focus(TileId(3), bounds(), tile_layout(3)).unwrap();
        assert!(m.engine().active_count() <= 2);
        assert_eq!(m.state(), FocusState::CrossAnimating);

        settle(&mut m);
        assert!(m.is_focused(TileId(3)));
        assert_at_rest(&m, 1);
        assert_at_rest(&m, 2);
    }

    #[test]
    fn test_refocus_after_full_return_starts_from_rest() {
        let mut m = machine(3);
        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        settle(&mut m);
        m.unfocus();
        settle(&mut m);

        m.focus(TileId(1), bounds(), tile_layout(1)).unwrap();
        let anim = m.engine().tween_for_tile(TileId(1)).unwrap();
        assert_eq!(m.engine().tween(anim).unwrap().from, tile_layout(1).visual());

        settle(&mut m);
        assert!(m.is_focused(TileId(1)));
    }
}
