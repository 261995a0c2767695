//! Renderer capability driven by the interaction controller.
//!
//! # Responsibility
//! - Describe what the controller may ask of a visual layer.
//! - Carry presentational state (tilt, shadow, exit animation) that is never
//!   persisted.
//!
//! # Invariants
//! - Renderers never mutate notes; the controller pushes every change.
//! - A handle stays valid until `remove` is called for it.

use crate::model::geometry::Point;
use crate::model::note::{Note, NoteColor};

mod recording;

pub use recording::{RecordingRenderer, RenderCommand, RenderedNote, COLLAPSED_HEIGHT};

/// Duration of the animated exit played when a note is deleted from its own
/// control.
pub const EXIT_ANIMATION_MS: u32 = 500;

/// Partial update pushed to an already rendered note.
#[derive(Debug, Clone, PartialEq)]
pub enum NotePatch {
    Position { top: i32, left: i32 },
    Size { width: i32, height: i32 },
    ZIndex(i64),
    Color(NoteColor),
    Pinned(bool),
    /// Height follows content and min-height is unset.
    Collapse,
    /// Explicit height and min-height after leaving the minimized state.
    Expand { height: i32, min_height: Option<i32> },
}

/// How a rendered note leaves the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTransition {
    Immediate,
    /// Scale and fade out over [`EXIT_ANIMATION_MS`], then detach.
    Animated,
}

/// Explicit box styles as read back from the visual layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedBox {
    pub width: i32,
    /// Explicit height, not the laid-out one; a min-height may enlarge the
    /// box on screen without changing this value.
    pub height: i32,
    pub min_height: Option<i32>,
}

/// Tilt, lift and shadow applied while a note is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransientVisual {
    pub tilt_x_deg: f64,
    pub tilt_y_deg: f64,
    pub shadow_x: f64,
    pub shadow_y: f64,
    pub shadow_blur: f64,
    pub shadow_alpha: f64,
    pub scale: f64,
}

impl TransientVisual {
    /// Neutral look of a note at rest.
    pub const RESTING: TransientVisual = TransientVisual {
        tilt_x_deg: 0.0,
        tilt_y_deg: 0.0,
        shadow_x: 0.0,
        shadow_y: 10.0,
        shadow_blur: 28.0,
        shadow_alpha: 0.5,
        scale: 1.0,
    };
}

impl Default for TransientVisual {
    fn default() -> Self {
        Self::RESTING
    }
}

/// Visual layer the controller drives.
pub trait Renderer {
    type Handle: Clone;

    /// Materializes `note` and returns a handle for later updates.
    fn render(&mut self, note: &Note) -> Self::Handle;

    fn reflect(&mut self, handle: &Self::Handle, patch: &NotePatch);

    /// Screen-space center of the rendered box, if it is still on screen.
    fn bounding_center(&self, handle: &Self::Handle) -> Option<Point>;

    fn measure(&self, handle: &Self::Handle) -> Option<RenderedBox>;

    fn remove(&mut self, handle: &Self::Handle, exit: ExitTransition);

    fn apply_transient_visual(&mut self, handle: &Self::Handle, visual: &TransientVisual);
}
