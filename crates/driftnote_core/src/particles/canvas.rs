//! Raster surface consumed by the particle field.

use crate::model::geometry::Point;

/// Straight-alpha color; channels 0..=255, alpha 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

/// Drawing calls the field issues each frame.
pub trait Canvas {
    /// Paints the whole surface; translucent fills leave fading history.
    fn fill_background(&mut self, color: Rgba);

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba);
}

/// One recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Background(Rgba),
    Disc {
        center: Point,
        radius: f64,
        color: Rgba,
    },
}

/// Canvas that records calls for an out-of-process painter.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    ops: Vec<DrawOp>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Canvas for DrawList {
    fn fill_background(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Background(color));
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba) {
        self.ops.push(DrawOp::Disc {
            center,
            radius,
            color,
        });
    }
}
