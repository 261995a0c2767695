//! Pointer/keyboard interaction layer.
//!
//! # Responsibility
//! - Turn raw input into note mutations through one dispatcher.
//! - Keep drag feedback presentational and out of the persisted model.

pub mod controller;
pub mod feedback;
pub mod gesture;
