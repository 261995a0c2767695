//! Persistence adapter for the note collection and preferences.
//!
//! # Responsibility
//! - Read the workspace document once at startup and rewrite it whole.
//! - Read/write the theme and particles preferences under their own keys.
//!
//! # Invariants
//! - A missing or unparseable document loads as an empty collection.
//! - `save_notes` always replaces the complete document.
//! - Preference reads never fail; unknown values fall back to defaults.

use super::kv_repo::{KvRepository, RepoResult};
use crate::model::note::Note;
use crate::model::prefs::{Preferences, Theme};
use log::{info, warn};

pub const NOTES_KEY: &str = "notes";
pub const THEME_KEY: &str = "theme";
pub const PARTICLES_KEY: &str = "particles";

/// Typed facade over a [`KvRepository`].
pub struct WorkspaceStore {
    kv: Box<dyn KvRepository + Send>,
}

impl WorkspaceStore {
    pub fn new(kv: impl KvRepository + Send + 'static) -> Self {
        Self { kv: Box::new(kv) }
    }

    /// Loads every stored note, or an empty collection on any failure.
    pub fn load_notes(&self) -> Vec<Note> {
        let raw = match self.kv.get(NOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=notes_load module=repo status=ok count=0 reason=absent");
                return Vec::new();
            }
            Err(err) => {
                warn!("event=notes_load module=repo status=degraded reason=read_failed error={err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => {
                info!(
                    "event=notes_load module=repo status=ok count={}",
                    notes.len()
                );
                notes
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=repo status=degraded reason=parse_failed bytes={} error={}",
                    raw.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Overwrites the stored collection with `notes`.
    pub fn save_notes(&mut self, notes: &[Note]) -> RepoResult<()> {
        let document = serde_json::to_string(notes)?;
        self.kv.set(NOTES_KEY, &document)
    }

    pub fn load_theme(&self) -> Theme {
        match self.kv.get(THEME_KEY) {
            Ok(value) => Theme::from_stored(value.as_deref()),
            Err(err) => {
                warn!("event=prefs_load module=repo status=degraded key={THEME_KEY} error={err}");
                Theme::default()
            }
        }
    }

    pub fn save_theme(&mut self, theme: Theme) -> RepoResult<()> {
        self.kv.set(THEME_KEY, theme.as_str())
    }

    /// Particles stay enabled unless the stored value is exactly `"false"`.
    pub fn load_particles_enabled(&self) -> bool {
        match self.kv.get(PARTICLES_KEY) {
            Ok(value) => value.as_deref() != Some("false"),
            Err(err) => {
                warn!(
                    "event=prefs_load module=repo status=degraded key={PARTICLES_KEY} error={err}"
                );
                true
            }
        }
    }

    pub fn save_particles_enabled(&mut self, enabled: bool) -> RepoResult<()> {
        self.kv
            .set(PARTICLES_KEY, if enabled { "true" } else { "false" })
    }

    pub fn load_preferences(&self) -> Preferences {
        Preferences {
            theme: self.load_theme(),
            particles_enabled: self.load_particles_enabled(),
        }
    }

    /// Direct access to the backing store.
    pub fn kv_mut(&mut self) -> &mut (dyn KvRepository + Send) {
        self.kv.as_mut()
    }
}
