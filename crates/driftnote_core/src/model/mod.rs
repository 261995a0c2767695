//! Workspace domain model.
//!
//! # Responsibility
//! - Define notes, their palette and geometry helpers.
//! - Hold the canonical note collection ([`workspace::Workspace`]).
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard removal; ids are never recycled.

pub mod geometry;
pub mod note;
pub mod prefs;
pub mod workspace;
