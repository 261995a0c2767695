//! Drag tilt and shadow derived from the raw pointer delta.

use crate::render::TransientVisual;

const MAX_TILT_DEG: f64 = 15.0;
const MAX_SHADOW_OFFSET: f64 = 20.0;
const DRAG_SCALE: f64 = 1.05;
const DRAG_SHADOW_BLUR: f64 = 50.0;
const DRAG_SHADOW_ALPHA: f64 = 0.6;

/// Visual for a note displaced by `(dx, dy)` since drag start.
pub fn drag_visual(dx: f64, dy: f64) -> TransientVisual {
    TransientVisual {
        tilt_x_deg: (dy / 10.0).clamp(-MAX_TILT_DEG, MAX_TILT_DEG),
        tilt_y_deg: (-dx / 10.0).clamp(-MAX_TILT_DEG, MAX_TILT_DEG),
        shadow_x: (dx / 2.0).clamp(-MAX_SHADOW_OFFSET, MAX_SHADOW_OFFSET),
        shadow_y: (dy / 2.0).clamp(-MAX_SHADOW_OFFSET, MAX_SHADOW_OFFSET),
        shadow_blur: DRAG_SHADOW_BLUR,
        shadow_alpha: DRAG_SHADOW_ALPHA,
        scale: DRAG_SCALE,
    }
}
