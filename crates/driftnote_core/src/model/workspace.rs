//! Canonical in-memory note collection.
//!
//! # Responsibility
//! - Own every live note and the process-wide z-order counter.
//! - Apply creation defaults and field-level mutations.
//!
//! # Invariants
//! - Note ids are unique; a load that carries duplicates keeps the first.
//! - The z counter starts at `max(1, max loaded zIndex)` and only grows;
//!   every issued value is strictly greater than all earlier ones.
//! - Mutating an unknown id is a no-op, never an error.
//! - Persistence is the caller's concern; this type does no I/O.

use super::note::{Note, NoteColor, NoteId, DUPLICATE_OFFSET};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::ops::Range;
use uuid::Uuid;

const SPAWN_TOP: Range<i32> = 60..260;
const SPAWN_LEFT: Range<i32> = 60..460;

/// Caller-provided overrides for [`Workspace::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteSeed {
    pub text: String,
    /// `(top, left)`; random placement when `None`.
    pub position: Option<(i32, i32)>,
}

/// Note collection plus z-order counter.
pub struct Workspace {
    notes: Vec<Note>,
    z_counter: i64,
    rng: StdRng,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::load(Vec::new())
    }
}

impl Workspace {
    /// Builds a workspace from a loaded collection.
    pub fn load(notes: Vec<Note>) -> Self {
        Self::load_with_rng(notes, StdRng::from_entropy())
    }

    /// Same as [`Workspace::load`] with a caller-chosen random source.
    pub fn load_with_rng(notes: Vec<Note>, rng: StdRng) -> Self {
        let mut seen = HashSet::with_capacity(notes.len());
        let mut unique = Vec::with_capacity(notes.len());
        for note in notes {
            if seen.insert(note.id) {
                unique.push(note);
            } else {
                warn!(
                    "event=workspace_load module=model status=skipped reason=duplicate_id note_id={}",
                    note.id
                );
            }
        }

        let z_counter = unique
            .iter()
            .map(|note| note.z_index)
            .max()
            .unwrap_or(1)
            .max(1);

        Self {
            notes: unique,
            z_counter,
            rng,
        }
    }

    /// Notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Highest z value issued so far.
    pub fn z_counter(&self) -> i64 {
        self.z_counter
    }

    /// Creates a note with fresh id and z value and default geometry.
    pub fn create(&mut self, seed: NoteSeed) -> Note {
        let (top, left) = seed.position.unwrap_or_else(|| {
            (
                self.rng.gen_range(SPAWN_TOP),
                self.rng.gen_range(SPAWN_LEFT),
            )
        });
        let color = NoteColor::random(&mut self.rng);
        let z_index = self.next_z();

        let mut note = Note::new(Uuid::new_v4(), top, left, color, z_index);
        note.text = seed.text;
        self.notes.push(note.clone());
        debug!(
            "event=note_create module=model status=ok note_id={} z_index={}",
            note.id, note.z_index
        );
        note
    }

    /// Clones `id` with a new id, a bumped z value and a fixed offset.
    pub fn duplicate(&mut self, id: NoteId) -> Option<Note> {
        let mut copy = self.get(id)?.clone();
        copy.id = Uuid::new_v4();
        copy.top = copy.top.saturating_add(DUPLICATE_OFFSET);
        copy.left = copy.left.saturating_add(DUPLICATE_OFFSET);
        copy.z_index = self.next_z();
        self.notes.push(copy.clone());
        debug!(
            "event=note_duplicate module=model status=ok source_id={} note_id={} z_index={}",
            id, copy.id, copy.z_index
        );
        Some(copy)
    }

    /// Removes `id`. Returns `false` when it was already gone.
    pub fn remove(&mut self, id: NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        self.notes.len() != before
    }

    /// Assigns a random palette color and returns it.
    pub fn recolor(&mut self, id: NoteId) -> Option<NoteColor> {
        let color = NoteColor::random(&mut self.rng);
        let note = self.get_mut(id)?;
        note.color = color;
        Some(color)
    }

    pub fn set_pinned(&mut self, id: NoteId, pinned: bool) -> bool {
        self.update(id, |note| note.pinned = pinned)
    }

    pub fn set_minimized(&mut self, id: NoteId, minimized: bool) -> bool {
        self.update(id, |note| note.minimized = minimized)
    }

    /// Stores the rendered sizing to restore after un-minimizing.
    pub fn set_restore_cache(
        &mut self,
        id: NoteId,
        prev_height: Option<i32>,
        prev_min_height: Option<i32>,
    ) -> bool {
        self.update(id, |note| {
            note.prev_height = prev_height;
            note.prev_min_height = prev_min_height;
        })
    }

    pub fn set_text(&mut self, id: NoteId, text: impl Into<String>) -> bool {
        let text = text.into();
        self.update(id, |note| note.text = text)
    }

    pub fn set_geometry(&mut self, id: NoteId, top: i32, left: i32, width: i32, height: i32) -> bool {
        self.update(id, |note| {
            note.top = top;
            note.left = left;
            note.width = width;
            note.height = height;
        })
    }

    pub fn set_position(&mut self, id: NoteId, top: i32, left: i32) -> bool {
        self.update(id, |note| {
            note.top = top;
            note.left = left;
        })
    }

    pub fn set_size(&mut self, id: NoteId, width: i32, height: i32) -> bool {
        self.update(id, |note| {
            note.width = width;
            note.height = height;
        })
    }

    /// Raises `id` above every other note and returns its new z value.
    pub fn bump_z(&mut self, id: NoteId) -> Option<i64> {
        self.get(id)?;
        let z_index = self.next_z();
        let note = self.get_mut(id)?;
        note.z_index = z_index;
        Some(z_index)
    }

    fn next_z(&mut self) -> i64 {
        self.z_counter += 1;
        self.z_counter
    }

    fn get_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.id == id)
    }

    fn update(&mut self, id: NoteId, apply: impl FnOnce(&mut Note)) -> bool {
        match self.get_mut(id) {
            Some(note) => {
                apply(note);
                true
            }
            None => {
                debug!("event=note_update module=model status=missing note_id={id}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteSeed, Workspace};
    use crate::model::note::{Note, NoteColor};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn seeded() -> Workspace {
        Workspace::load_with_rng(Vec::new(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn z_counter_starts_at_loaded_maximum() {
        let notes = vec![
            Note::new(Uuid::new_v4(), 0, 0, NoteColor::Lemon, 4),
            Note::new(Uuid::new_v4(), 0, 0, NoteColor::Lemon, 9),
        ];
        let workspace = Workspace::load(notes);
        assert_eq!(workspace.z_counter(), 9);
    }

    #[test]
    fn z_counter_never_starts_below_one() {
        let notes = vec![Note::new(Uuid::new_v4(), 0, 0, NoteColor::Lemon, -3)];
        assert_eq!(Workspace::load(notes).z_counter(), 1);
        assert_eq!(Workspace::default().z_counter(), 1);
    }

    #[test]
    fn create_places_note_inside_spawn_area() {
        let mut workspace = seeded();
        for _ in 0..50 {
            let note = workspace.create(NoteSeed::default());
            assert!((60..260).contains(&note.top));
            assert!((60..460).contains(&note.left));
            assert_eq!((note.width, note.height), (240, 150));
            assert!(!note.pinned && !note.minimized);
        }
    }

    #[test]
    fn create_honors_seed() {
        let mut workspace = seeded();
        let note = workspace.create(NoteSeed {
            text: "groceries".to_string(),
            position: Some((13, 17)),
        });
        assert_eq!(note.text, "groceries");
        assert_eq!((note.top, note.left), (13, 17));
    }

    #[test]
    fn duplicate_load_ids_keep_first() {
        let id = Uuid::new_v4();
        let mut first = Note::new(id, 0, 0, NoteColor::Lemon, 2);
        first.text = "first".to_string();
        let second = Note::new(id, 0, 0, NoteColor::Mint, 3);
        let workspace = Workspace::load(vec![first, second]);
        assert_eq!(workspace.len(), 1);
        assert_eq!(workspace.get(id).map(|n| n.text.as_str()), Some("first"));
    }

    #[test]
    fn set_geometry_replaces_box_without_touching_z() {
        let mut workspace = seeded();
        let note = workspace.create(NoteSeed::default());
        assert!(workspace.set_geometry(note.id, 40, 80, 300, 200));
        let updated = workspace.get(note.id).unwrap();
        assert_eq!(
            (updated.top, updated.left, updated.width, updated.height),
            (40, 80, 300, 200)
        );
        assert_eq!(updated.z_index, note.z_index);
    }

    #[test]
    fn mutators_ignore_unknown_ids() {
        let mut workspace = seeded();
        let ghost = Uuid::new_v4();
        assert!(!workspace.set_text(ghost, "x"));
        assert!(!workspace.set_pinned(ghost, true));
        assert!(workspace.recolor(ghost).is_none());
        assert!(workspace.bump_z(ghost).is_none());
        assert!(workspace.duplicate(ghost).is_none());
        assert!(!workspace.remove(ghost));
        assert_eq!(workspace.z_counter(), 1);
    }

    #[test]
    fn duplicate_offset_saturates_at_far_edge() {
        let edge = i32::MAX - 5;
        let mut workspace = Workspace::load(vec![Note::new(
            Uuid::new_v4(),
            edge,
            edge,
            NoteColor::Lemon,
            1,
        )]);
        let source = workspace.notes()[0].id;
        let copy = workspace.duplicate(source).unwrap();
        assert_eq!((copy.top, copy.left), (i32::MAX, i32::MAX));
        assert_eq!(workspace.len(), 2);
    }

    #[test]
    fn bump_z_moves_note_to_top() {
        let mut workspace = seeded();
        let a = workspace.create(NoteSeed::default());
        let b = workspace.create(NoteSeed::default());
        let top = |w: &Workspace| w.notes().iter().max_by_key(|n| n.z_index).map(|n| n.id);
        assert_eq!(top(&workspace), Some(b.id));
        workspace.bump_z(a.id);
        assert_eq!(top(&workspace), Some(a.id));
    }
}
