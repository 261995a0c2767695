//! Input events and the single armed-gesture state.

use crate::model::geometry::Point;
use crate::model::note::NoteId;

/// Part of a note that received a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRegion {
    /// Anywhere on the note outside its interactive children.
    Body,
    TextArea,
    /// Any of the pin/color/minimize/duplicate/delete controls.
    Button,
    ResizeHandle,
}

impl NoteRegion {
    /// Parses host labels (`body|text|button|resize`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "body" => Some(Self::Body),
            "text" | "textarea" => Some(Self::TextArea),
            "button" => Some(Self::Button),
            "resize" | "resize_handle" => Some(Self::ResizeHandle),
            _ => None,
        }
    }
}

/// What the pointer landed on, as resolved by the visual layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Background,
    Note { id: NoteId, region: NoteRegion },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { at: Point, target: PointerTarget },
    Move { at: Point },
    Up { at: Point },
}

/// Gesture armed by the last pointer-down. Only one exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        id: NoteId,
        start: Point,
        start_left: i32,
        start_top: i32,
    },
    Resizing {
        id: NoteId,
        start: Point,
        start_width: i32,
        start_height: i32,
    },
}

impl InteractionState {
    /// Note targeted by the armed gesture.
    pub fn target(&self) -> Option<NoteId> {
        match *self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Character(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

/// Keyboard shortcuts acting on the selected note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Delete,
    Duplicate,
}

impl Shortcut {
    /// `Delete` deletes; `Ctrl+D` (either case) duplicates.
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        match event.key {
            Key::Delete => Some(Self::Delete),
            Key::Character(c) if event.modifiers.ctrl && c.eq_ignore_ascii_case(&'d') => {
                Some(Self::Duplicate)
            }
            _ => None,
        }
    }
}
