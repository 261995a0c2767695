//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its palette.
//! - Fix the on-disk field names of the workspace document.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `top`/`left` are multiples of [`SNAP_UNIT`](super::geometry::SNAP_UNIT)
//!   after any drag; creation-time placement is not snapped.
//! - Interactive resizes never go below [`MIN_NOTE_WIDTH`] x [`MIN_NOTE_HEIGHT`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a note. The only durable join key.
pub type NoteId = Uuid;

pub const MIN_NOTE_WIDTH: i32 = 160;
pub const MIN_NOTE_HEIGHT: i32 = 110;
pub const DEFAULT_NOTE_WIDTH: i32 = 240;
pub const DEFAULT_NOTE_HEIGHT: i32 = 150;
/// Offset applied to both axes when duplicating.
pub const DUPLICATE_OFFSET: i32 = 30;

/// Fixed six-entry note palette, serialized as CSS hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteColor {
    #[serde(rename = "#fff8b0")]
    Lemon,
    #[serde(rename = "#ffd6a5")]
    Peach,
    #[serde(rename = "#a0e7e5")]
    Aqua,
    #[serde(rename = "#b4f8c8")]
    Mint,
    #[serde(rename = "#d0f4de")]
    Sage,
    #[serde(rename = "#ffd966")]
    Amber,
}

impl NoteColor {
    pub const PALETTE: [NoteColor; 6] = [
        NoteColor::Lemon,
        NoteColor::Peach,
        NoteColor::Aqua,
        NoteColor::Mint,
        NoteColor::Sage,
        NoteColor::Amber,
    ];

    /// Picks a palette entry uniformly at random. The previous color may repeat.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::PALETTE[rng.gen_range(0..Self::PALETTE.len())]
    }

    pub fn hex(self) -> &'static str {
        match self {
            Self::Lemon => "#fff8b0",
            Self::Peach => "#ffd6a5",
            Self::Aqua => "#a0e7e5",
            Self::Mint => "#b4f8c8",
            Self::Sage => "#d0f4de",
            Self::Amber => "#ffd966",
        }
    }
}

fn default_z_index() -> i64 {
    1
}

/// One sticky note as stored and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
    pub color: NoteColor,
    /// Stacking order. Higher draws on top and wins pointer hits.
    #[serde(rename = "zIndex", default = "default_z_index")]
    pub z_index: i64,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub minimized: bool,
    /// Rendered height captured when the note was last minimized.
    #[serde(rename = "_prevHeight", default)]
    pub prev_height: Option<i32>,
    /// Rendered min-height captured when the note was last minimized.
    #[serde(rename = "_prevMinHeight", default)]
    pub prev_min_height: Option<i32>,
}

impl Note {
    /// Builds a note with default size and flags at the given position.
    pub fn new(id: NoteId, top: i32, left: i32, color: NoteColor, z_index: i64) -> Self {
        Self {
            id,
            text: String::new(),
            top,
            left,
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
            color,
            z_index,
            pinned: false,
            minimized: false,
            prev_height: None,
            prev_min_height: None,
        }
    }

    /// Clamps a candidate interactive size to the enforced minimums.
    pub fn clamp_size(width: i32, height: i32) -> (i32, i32) {
        (width.max(MIN_NOTE_WIDTH), height.max(MIN_NOTE_HEIGHT))
    }
}
