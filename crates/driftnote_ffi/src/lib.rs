//! Flutter-facing bindings for the Driftnote core.

pub mod api;
