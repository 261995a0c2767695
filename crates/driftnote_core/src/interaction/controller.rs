//! Workspace controller: the single owner of interactive state.
//!
//! # Responsibility
//! - Route the pointer stream to the one armed gesture.
//! - Run collection-level operations and keyboard shortcuts.
//! - Keep the renderer and the persisted document in step with the model.
//!
//! # Invariants
//! - At most one gesture is armed; a new pointer-down completes the old one.
//! - Dragged positions are snapped before they reach the model.
//! - Interactive sizes never go below the note minimums.
//! - Each gesture writes the store once, on completion.
//! - Store failures are logged; the in-memory model stays authoritative.

use super::feedback::drag_visual;
use super::gesture::{InteractionState, KeyEvent, NoteRegion, PointerEvent, PointerTarget, Shortcut};
use crate::model::geometry::{snap, Point};
use crate::model::note::{Note, NoteColor, NoteId};
use crate::model::prefs::{Preferences, Theme};
use crate::model::workspace::{NoteSeed, Workspace};
use crate::render::{ExitTransition, NotePatch, Renderer, TransientVisual};
use crate::repo::workspace_store::WorkspaceStore;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct WorkspaceController<R: Renderer> {
    workspace: Workspace,
    store: WorkspaceStore,
    renderer: R,
    /// Render handles in render order.
    handles: Vec<(NoteId, R::Handle)>,
    prefs: Preferences,
    selected: Option<NoteId>,
    interaction: InteractionState,
}

impl<R: Renderer> WorkspaceController<R> {
    /// Loads notes and preferences from `store` and renders every note.
    pub fn open(store: WorkspaceStore, renderer: R) -> Self {
        Self::open_with_rng(store, renderer, StdRng::from_entropy())
    }

    /// Same as [`WorkspaceController::open`] with a caller-chosen random source.
    pub fn open_with_rng(store: WorkspaceStore, renderer: R, rng: StdRng) -> Self {
        let notes = store.load_notes();
        let prefs = store.load_preferences();
        let workspace = Workspace::load_with_rng(notes, rng);

        let mut controller = Self {
            workspace,
            store,
            renderer,
            handles: Vec::new(),
            prefs,
            selected: None,
            interaction: InteractionState::Idle,
        };
        let loaded = controller.workspace.notes().to_vec();
        for note in &loaded {
            controller.attach(note);
        }

        info!(
            "event=workspace_open module=interaction status=ok notes={} z_counter={} theme={} particles={}",
            controller.workspace.len(),
            controller.workspace.z_counter(),
            controller.prefs.theme.as_str(),
            controller.prefs.particles_enabled
        );
        controller
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn store(&self) -> &WorkspaceStore {
        &self.store
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    /// Note most recently picked up by a drag.
    pub fn selected(&self) -> Option<NoteId> {
        self.selected
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    pub fn handle(&self, id: NoteId) -> Option<&R::Handle> {
        self.handles
            .iter()
            .find(|(note_id, _)| *note_id == id)
            .map(|(_, handle)| handle)
    }

    /// Centers of on-screen notes in render order.
    pub fn note_centers(&self) -> Vec<Point> {
        self.handles
            .iter()
            .filter_map(|(_, handle)| self.renderer.bounding_center(handle))
            .collect()
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { at, target } => self.pointer_down(at, target),
            PointerEvent::Move { at } => self.pointer_move(at),
            PointerEvent::Up { at } => self.pointer_up(at),
        }
    }

    pub fn pointer_down(&mut self, at: Point, target: PointerTarget) {
        let PointerTarget::Note { id, region } = target else {
            return;
        };
        let Some(note) = self.workspace.get(id) else {
            debug!("event=pointer_down module=interaction status=missing note_id={id}");
            return;
        };
        let (top, left, width, height, minimized) =
            (note.top, note.left, note.width, note.height, note.minimized);

        match region {
            NoteRegion::Body => {
                self.finish_gesture();
                self.interaction = InteractionState::Dragging {
                    id,
                    start: at,
                    start_left: left,
                    start_top: top,
                };
                self.selected = Some(id);
                if let Some(z_index) = self.workspace.bump_z(id) {
                    self.reflect(id, NotePatch::ZIndex(z_index));
                }
                debug!("event=drag_start module=interaction status=ok note_id={id}");
            }
            NoteRegion::ResizeHandle if !minimized => {
                self.finish_gesture();
                self.interaction = InteractionState::Resizing {
                    id,
                    start: at,
                    start_width: width,
                    start_height: height,
                };
                debug!("event=resize_start module=interaction status=ok note_id={id}");
            }
            NoteRegion::ResizeHandle | NoteRegion::TextArea | NoteRegion::Button => {}
        }
    }

    pub fn pointer_move(&mut self, at: Point) {
        match self.interaction {
            InteractionState::Idle => {}
            InteractionState::Dragging {
                id,
                start,
                start_left,
                start_top,
            } => {
                let dx = at.x - start.x;
                let dy = at.y - start.y;
                let left = snap(f64::from(start_left) + dx);
                let top = snap(f64::from(start_top) + dy);
                let moved = self
                    .workspace
                    .get(id)
                    .is_some_and(|note| note.left != left || note.top != top);
                if moved {
                    self.workspace.set_position(id, top, left);
                    self.reflect(id, NotePatch::Position { top, left });
                }
                self.apply_visual(id, drag_visual(dx, dy));
            }
            InteractionState::Resizing {
                id,
                start,
                start_width,
                start_height,
            } => {
                let (width, height) = Note::clamp_size(
                    start_width.saturating_add((at.x - start.x).round() as i32),
                    start_height.saturating_add((at.y - start.y).round() as i32),
                );
                let changed = self
                    .workspace
                    .get(id)
                    .is_some_and(|note| note.width != width || note.height != height);
                if changed {
                    self.workspace.set_size(id, width, height);
                    self.reflect(id, NotePatch::Size { width, height });
                }
            }
        }
    }

    /// Ends the armed gesture wherever the pointer is released.
    pub fn pointer_up(&mut self, _at: Point) {
        self.finish_gesture();
    }

    /// Applies a keyboard shortcut to the selected note.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<Shortcut> {
        let shortcut = Shortcut::from_key(event)?;
        let id = self.selected?;
        if self.workspace.get(id).is_none() {
            self.selected = None;
            return None;
        }

        match shortcut {
            Shortcut::Delete => {
                self.remove_note(id, ExitTransition::Immediate);
            }
            Shortcut::Duplicate => {
                self.duplicate_note(id);
            }
        }
        Some(shortcut)
    }

    pub fn create_note(&mut self) -> Note {
        self.create_note_with(NoteSeed::default())
    }

    pub fn create_note_with(&mut self, seed: NoteSeed) -> Note {
        let note = self.workspace.create(seed);
        self.persist("create");
        self.attach(&note);
        note
    }

    pub fn duplicate_note(&mut self, id: NoteId) -> Option<Note> {
        let copy = self.workspace.duplicate(id)?;
        self.persist("duplicate");
        self.attach(&copy);
        Some(copy)
    }

    /// Deletes from the note's own control: data goes now, the visual fades out.
    pub fn delete_note(&mut self, id: NoteId) -> bool {
        self.remove_note(id, ExitTransition::Animated)
    }

    pub fn recolor_note(&mut self, id: NoteId) -> Option<NoteColor> {
        let color = self.workspace.recolor(id)?;
        self.persist("recolor");
        self.reflect(id, NotePatch::Color(color));
        Some(color)
    }

    /// Flips the pinned flag and returns the new value.
    pub fn toggle_pin(&mut self, id: NoteId) -> Option<bool> {
        let pinned = !self.workspace.get(id)?.pinned;
        self.workspace.set_pinned(id, pinned);
        self.persist("pin");
        self.reflect(id, NotePatch::Pinned(pinned));
        Some(pinned)
    }

    /// Flips the minimized flag and returns the new value.
    pub fn toggle_minimize(&mut self, id: NoteId) -> Option<bool> {
        let note = self.workspace.get(id)?;
        let minimize = !note.minimized;
        let model_height = note.height;

        if minimize {
            let measured = self.handle(id).and_then(|handle| self.renderer.measure(handle));
            let prev_height = measured.map_or(model_height, |rendered| rendered.height);
            let prev_min_height = measured.and_then(|rendered| rendered.min_height);
            self.workspace
                .set_restore_cache(id, Some(prev_height), prev_min_height);
            self.workspace.set_minimized(id, true);
            self.reflect(id, NotePatch::Collapse);
        } else {
            let note = self.workspace.get(id)?;
            let height = note.prev_height.unwrap_or(model_height);
            let min_height = note.prev_min_height;
            self.workspace.set_minimized(id, false);
            self.reflect(id, NotePatch::Expand { height, min_height });
        }

        self.persist("minimize");
        Some(minimize)
    }

    pub fn set_text(&mut self, id: NoteId, text: impl Into<String>) -> bool {
        if !self.workspace.set_text(id, text) {
            return false;
        }
        self.persist("text");
        true
    }

    /// Re-captures a size change the visual layer made on its own.
    ///
    /// Ignored while minimized and when the size already matches the model.
    pub fn on_box_resized(&mut self, id: NoteId, width: i32, height: i32) -> bool {
        let Some(note) = self.workspace.get(id) else {
            return false;
        };
        if note.minimized || (note.width == width && note.height == height) {
            return false;
        }
        self.workspace.set_size(id, width, height);
        self.reflect(id, NotePatch::Size { width, height });
        self.persist("layout_resize");
        true
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.prefs.theme = self.prefs.theme.toggled();
        if let Err(err) = self.store.save_theme(self.prefs.theme) {
            warn!("event=prefs_save module=interaction status=error key=theme error={err}");
        }
        self.prefs.theme
    }

    pub fn toggle_particles(&mut self) -> bool {
        self.prefs.particles_enabled = !self.prefs.particles_enabled;
        if let Err(err) = self
            .store
            .save_particles_enabled(self.prefs.particles_enabled)
        {
            warn!("event=prefs_save module=interaction status=error key=particles error={err}");
        }
        self.prefs.particles_enabled
    }

    fn remove_note(&mut self, id: NoteId, exit: ExitTransition) -> bool {
        if !self.workspace.remove(id) {
            debug!("event=note_delete module=interaction status=missing note_id={id}");
            return false;
        }
        if self.interaction.target() == Some(id) {
            self.interaction = InteractionState::Idle;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.persist("delete");

        if let Some(index) = self.handles.iter().position(|(note_id, _)| *note_id == id) {
            let (_, handle) = self.handles.remove(index);
            self.renderer.remove(&handle, exit);
        }
        true
    }

    fn finish_gesture(&mut self) {
        match std::mem::take(&mut self.interaction) {
            InteractionState::Idle => {}
            InteractionState::Dragging { id, .. } => {
                self.apply_visual(id, TransientVisual::RESTING);
                self.persist("drag_end");
                debug!("event=drag_end module=interaction status=ok note_id={id}");
            }
            InteractionState::Resizing { id, .. } => {
                self.persist("resize_end");
                debug!("event=resize_end module=interaction status=ok note_id={id}");
            }
        }
    }

    fn attach(&mut self, note: &Note) {
        let handle = self.renderer.render(note);
        self.handles.push((note.id, handle));
    }

    fn reflect(&mut self, id: NoteId, patch: NotePatch) {
        if let Some(handle) = self.handle(id).cloned() {
            self.renderer.reflect(&handle, &patch);
        }
    }

    fn apply_visual(&mut self, id: NoteId, visual: TransientVisual) {
        if let Some(handle) = self.handle(id).cloned() {
            self.renderer.apply_transient_visual(&handle, &visual);
        }
    }

    fn persist(&mut self, reason: &'static str) {
        match self.store.save_notes(self.workspace.notes()) {
            Ok(()) => debug!(
                "event=notes_save module=interaction status=ok reason={} count={}",
                reason,
                self.workspace.len()
            ),
            Err(err) => warn!(
                "event=notes_save module=interaction status=error reason={} error={}",
                reason, err
            ),
        }
    }
}
