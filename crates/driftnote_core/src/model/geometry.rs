//! Screen-space geometry shared by notes, gestures and particles.

use serde::{Deserialize, Serialize};

/// Grid unit that dragged positions are rounded to.
pub const SNAP_UNIT: i32 = 20;

/// Point in device pixels. Fractional because pointer devices report
/// sub-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rounds `value` to the nearest multiple of [`SNAP_UNIT`].
pub fn snap(value: f64) -> i32 {
    let unit = f64::from(SNAP_UNIT);
    ((value / unit).round() * unit) as i32
}
