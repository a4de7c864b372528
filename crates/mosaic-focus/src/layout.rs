//! Resting layouts and focus framing.
//!
//! The placement algorithms that scatter tiles across the viewport live in
//! the host; this module only defines the data they hand over
//! (`OriginalLayout`, `ContainerBounds`) and the framing math that turns a
//! resting layout into the enlarged, centered focus presentation.

use mosaic_animation::{Dimensions, Placement, Visual};
use serde::{Deserialize, Serialize};

/// The viewport rectangle the focused tile is centered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the bounds.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True if every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// True if the bounds enclose a positive area.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Immutable per-tile resting state, supplied by the host's layout generator
/// when a tile is first offered to the focus machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginalLayout {
    /// Center x of the tile at rest.
    pub x: f64,
    /// Center y of the tile at rest.
    pub y: f64,
    /// Resting rotation in degrees.
    pub rotation: f64,
    /// Resting scale factor.
    pub scale: f64,
    /// Resting stacking order.
    pub z_index: i32,
    /// Unscaled pixel width.
    pub width: f64,
    /// Unscaled pixel height.
    pub height: f64,
}

impl OriginalLayout {
    /// The resting visual this layout describes.
    pub fn visual(&self) -> Visual {
        Visual::new(
            Placement::new(self.x, self.y, self.rotation, self.scale),
            Dimensions::new(self.width, self.height),
        )
    }

    /// True if the layout can be animated: all components finite, positive
    /// dimensions and scale.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.rotation.is_finite()
            && self.scale.is_finite()
            && self.scale > 0.0
            && Dimensions::new(self.width, self.height).is_valid()
    }
}

/// Parameters of the focus presentation geometry.
///
/// The focused tile is centered in the container and scaled so its limiting
/// axis fills `fill_fraction` of the container, capped at `max_scale` so
/// small thumbnails do not blow up past their useful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusFraming {
    /// Fraction of the container's limiting axis the tile should fill.
    pub fill_fraction: f64,
    /// Upper bound on the focus scale factor.
    pub max_scale: f64,
}

impl Default for FocusFraming {
    fn default() -> Self {
        Self {
            fill_fraction: 0.8,
            max_scale: 4.0,
        }
    }
}

/// Compute the focus presentation for a tile: centered in `bounds`, upright,
/// scaled per `framing`, dimensions unchanged.
pub fn focus_visual(bounds: &ContainerBounds, layout: &OriginalLayout, framing: &FocusFraming) -> Visual {
    let (cx, cy) = bounds.center();

    let fit_x = bounds.width * framing.fill_fraction / layout.width;
    let fit_y = bounds.height * framing.fill_fraction / layout.height;
    let scale = fit_x.min(fit_y).min(framing.max_scale);

    Visual::new(
        Placement::new(cx, cy, 0.0, scale),
        Dimensions::new(layout.width, layout.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> OriginalLayout {
        OriginalLayout {
            x: 120.0,
            y: 340.0,
            rotation: -8.0,
            scale: 1.0,
            z_index: 3,
            width: 200.0,
            height: 150.0,
        }
    }

    #[test]
    fn test_bounds_center_and_validity() {
        let bounds = ContainerBounds::new(0.0, 0.0, 1280.0, 800.0);
        assert_eq!(bounds.center(), (640.0, 400.0));
        assert!(bounds.is_finite());
        assert!(bounds.has_area());

        assert!(!ContainerBounds::new(0.0, 0.0, 0.0, 800.0).has_area());
        assert!(!ContainerBounds::new(f64::NAN, 0.0, 100.0, 100.0).is_finite());
    }

    #[test]
    fn test_layout_visual_round_trip() {
        let visual = layout().visual();
        assert_eq!(visual.placement.x, 120.0);
        assert_eq!(visual.placement.rotation, -8.0);
        assert_eq!(visual.size.width, 200.0);
    }

    #[test]
    fn test_layout_validity() {
        assert!(layout().is_valid());

        let mut bad = layout();
        bad.scale = 0.0;
        assert!(!bad.is_valid());

        let mut bad = layout();
        bad.width = -5.0;
        assert!(!bad.is_valid());

        let mut bad = layout();
        bad.rotation = f64::INFINITY;
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_focus_visual_centers_and_uprights() {
        let bounds = ContainerBounds::new(0.0, 0.0, 1000.0, 800.0);
        let focused = focus_visual(&bounds, &layout(), &FocusFraming::default());

        assert_eq!(focused.placement.x, 500.0);
        assert_eq!(focused.placement.y, 400.0);
        assert_eq!(focused.placement.rotation, 0.0);
        // Dimensions are untouched; zoom is expressed through scale
        assert_eq!(focused.size.width, 200.0);
    }

    #[test]
    fn test_focus_visual_limiting_axis() {
        // Tile is 200x150 in a 1000x800 container at 0.8 fill:
        // fit_x = 800/200 = 4.0, fit_y = 640/150 ≈ 4.27 → x limits
        let bounds = ContainerBounds::new(0.0, 0.0, 1000.0, 800.0);
        let framing = FocusFraming {
            fill_fraction: 0.8,
            max_scale: 10.0,
        };
        let focused = focus_visual(&bounds, &layout(), &framing);
        assert!((focused.placement.scale - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_focus_visual_scale_cap() {
        let bounds = ContainerBounds::new(0.0, 0.0, 4000.0, 4000.0);
        let framing = FocusFraming {
            fill_fraction: 0.9,
            max_scale: 3.0,
        };
        let focused = focus_visual(&bounds, &layout(), &framing);
        assert_eq!(focused.placement.scale, 3.0);
    }
}
