//! Core engine for the Driftnote sticky-note canvas.
//! This crate is the single source of truth for note invariants.

pub mod db;
pub mod interaction;
pub mod logging;
pub mod model;
pub mod particles;
pub mod render;
pub mod repo;

pub use interaction::controller::WorkspaceController;
pub use interaction::gesture::{
    InteractionState, Key, KeyEvent, Modifiers, NoteRegion, PointerEvent, PointerTarget, Shortcut,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::geometry::{snap, Point, SNAP_UNIT};
pub use model::note::{
    Note, NoteColor, NoteId, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, DUPLICATE_OFFSET,
    MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH,
};
pub use model::prefs::{Preferences, Theme};
pub use model::workspace::{NoteSeed, Workspace};
pub use particles::canvas::{Canvas, DrawList, DrawOp, Rgba};
pub use particles::field::{Motion, Particle, ParticleField, CAPTURE_RADIUS, PARTICLE_COUNT};
pub use particles::trail::{Trail, TRAIL_LENGTH};
pub use render::{
    ExitTransition, NotePatch, RecordingRenderer, RenderCommand, RenderedBox, Renderer,
    TransientVisual, EXIT_ANIMATION_MS,
};
pub use repo::kv_repo::{
    KvRepository, MemoryKvRepository, RepoError, RepoResult, SqliteKvRepository,
};
pub use repo::workspace_store::WorkspaceStore;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
