//! Decorative particle field drawn behind the notes.

pub mod canvas;
pub mod field;
pub mod trail;
