//! Mid-flight sampling: hand a tween's exact current visual to a new one.
//!
//! When a running transition is interrupted, the replacement must start from
//! the precise visual the tile occupies on screen right now, or the tile
//! jumps for one frame. [`freeze`] does the three steps in the only safe
//! order: sample the live value, commit it to the surface as the tile's
//! static state, and only then cancel the tween.

use mosaic_animation::{AnimationId, TweenEngine, Visual};

use crate::surface::RenderSurface;

/// Sample a running tween, commit the sampled visual as the tile's static
/// state, and cancel the tween.
///
/// Returns `None` if the tween is no longer running, in which case nothing
/// is touched; the tile's committed state is already current.
pub fn freeze<S: RenderSurface>(
    engine: &mut TweenEngine,
    surface: &mut S,
    anim: AnimationId,
) -> Option<Visual> {
    let tween = engine.tween(anim)?;
    let tile = tween.tile;
    let visual = tween.current_visual();

    // Commit before cancelling so no frame observes a stale value
    surface.set_visual(tile, visual);
    engine.cancel(anim);

    Some(visual)
}
