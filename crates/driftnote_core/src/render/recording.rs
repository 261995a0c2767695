//! Headless renderer that keeps a box model and a command log.
//!
//! Hosts that draw out of process (the FFI layer) drain the command log each
//! frame; tests inspect both the log and the box model.

use super::{ExitTransition, NotePatch, RenderedBox, Renderer, TransientVisual};
use crate::model::geometry::Point;
use crate::model::note::{Note, NoteId, MIN_NOTE_HEIGHT};
use std::collections::BTreeMap;

/// Height assumed for a collapsed (content-sized) note.
pub const COLLAPSED_HEIGHT: i32 = 48;

/// One instruction for an external visual layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Render { handle: u64, note: Note },
    Reflect { handle: u64, patch: NotePatch },
    Visual { handle: u64, visual: TransientVisual },
    Remove { handle: u64, exit: ExitTransition },
}

/// Box model of one rendered note.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNote {
    pub note_id: NoteId,
    pub top: i32,
    pub left: i32,
    pub width: i32,
    /// Explicit height; ignored while collapsed.
    pub height: i32,
    pub min_height: Option<i32>,
    pub collapsed: bool,
    pub z_index: i64,
    pub visual: TransientVisual,
}

impl RenderedNote {
    fn effective_height(&self) -> i32 {
        if self.collapsed {
            COLLAPSED_HEIGHT
        } else {
            self.height.max(self.min_height.unwrap_or(0))
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: u64,
    boxes: BTreeMap<u64, RenderedNote>,
    exiting: BTreeMap<u64, RenderedNote>,
    commands: Vec<RenderCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the recorded commands.
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn rendered(&self, handle: u64) -> Option<&RenderedNote> {
        self.boxes.get(&handle)
    }

    /// Notes still playing their exit animation.
    pub fn exiting_count(&self) -> usize {
        self.exiting.len()
    }

    /// Detaches every note whose exit animation has finished.
    pub fn complete_exit_animations(&mut self) {
        self.exiting.clear();
    }
}

impl Renderer for RecordingRenderer {
    type Handle = u64;

    fn render(&mut self, note: &Note) -> u64 {
        self.next_handle += 1;
        let handle = self.next_handle;
        self.boxes.insert(
            handle,
            RenderedNote {
                note_id: note.id,
                top: note.top,
                left: note.left,
                width: note.width,
                height: note.height,
                min_height: Some(MIN_NOTE_HEIGHT),
                collapsed: note.minimized,
                z_index: note.z_index,
                visual: TransientVisual::RESTING,
            },
        );
        self.commands.push(RenderCommand::Render {
            handle,
            note: note.clone(),
        });
        handle
    }

    fn reflect(&mut self, handle: &u64, patch: &NotePatch) {
        let Some(rendered) = self.boxes.get_mut(handle) else {
            return;
        };
        match *patch {
            NotePatch::Position { top, left } => {
                rendered.top = top;
                rendered.left = left;
            }
            NotePatch::Size { width, height } => {
                rendered.width = width;
                rendered.height = height;
            }
            NotePatch::ZIndex(z_index) => rendered.z_index = z_index,
            NotePatch::Color(_) | NotePatch::Pinned(_) => {}
            NotePatch::Collapse => {
                rendered.collapsed = true;
                rendered.min_height = None;
            }
            NotePatch::Expand { height, min_height } => {
                rendered.collapsed = false;
                rendered.height = height;
                rendered.min_height = min_height;
            }
        }
        self.commands.push(RenderCommand::Reflect {
            handle: *handle,
            patch: patch.clone(),
        });
    }

    fn bounding_center(&self, handle: &u64) -> Option<Point> {
        let rendered = self.boxes.get(handle)?;
        Some(Point::new(
            f64::from(rendered.left) + f64::from(rendered.width) / 2.0,
            f64::from(rendered.top) + f64::from(rendered.effective_height()) / 2.0,
        ))
    }

    fn measure(&self, handle: &u64) -> Option<RenderedBox> {
        let rendered = self.boxes.get(handle)?;
        Some(RenderedBox {
            width: rendered.width,
            height: rendered.height,
            min_height: rendered.min_height,
        })
    }

    fn remove(&mut self, handle: &u64, exit: ExitTransition) {
        if let Some(rendered) = self.boxes.remove(handle) {
            if exit == ExitTransition::Animated {
                self.exiting.insert(*handle, rendered);
            }
        }
        self.commands.push(RenderCommand::Remove {
            handle: *handle,
            exit,
        });
    }

    fn apply_transient_visual(&mut self, handle: &u64, visual: &TransientVisual) {
        if let Some(rendered) = self.boxes.get_mut(handle) {
            rendered.visual = *visual;
        }
        self.commands.push(RenderCommand::Visual {
            handle: *handle,
            visual: *visual,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordingRenderer, COLLAPSED_HEIGHT};
    use crate::model::note::{Note, NoteColor};
    use crate::render::{ExitTransition, NotePatch, Renderer};
    use uuid::Uuid;

    #[test]
    fn center_tracks_position_and_collapse() {
        let mut renderer = RecordingRenderer::new();
        let note = Note::new(Uuid::new_v4(), 100, 200, NoteColor::Mint, 2);
        let handle = renderer.render(&note);

        let center = renderer.bounding_center(&handle).unwrap();
        assert_eq!((center.x, center.y), (320.0, 175.0));

        renderer.reflect(&handle, &NotePatch::Collapse);
        let center = renderer.bounding_center(&handle).unwrap();
        assert_eq!(center.y, 100.0 + f64::from(COLLAPSED_HEIGHT) / 2.0);
    }

    #[test]
    fn measure_reports_explicit_height_under_min_height() {
        let mut renderer = RecordingRenderer::new();
        let note = Note::new(Uuid::new_v4(), 0, 0, NoteColor::Mint, 2);
        let handle = renderer.render(&note);
        renderer.reflect(
            &handle,
            &NotePatch::Size {
                width: 240,
                height: 80,
            },
        );

        let measured = renderer.measure(&handle).unwrap();
        assert_eq!(measured.height, 80);
        assert_eq!(measured.min_height, Some(110));
        let center = renderer.bounding_center(&handle).unwrap();
        assert_eq!(center.y, 55.0);
    }

    #[test]
    fn animated_removal_lingers_until_completed() {
        let mut renderer = RecordingRenderer::new();
        let note = Note::new(Uuid::new_v4(), 0, 0, NoteColor::Mint, 2);
        let handle = renderer.render(&note);

        renderer.remove(&handle, ExitTransition::Animated);
        assert!(renderer.bounding_center(&handle).is_none());
        assert_eq!(renderer.exiting_count(), 1);

        renderer.complete_exit_animations();
        assert_eq!(renderer.exiting_count(), 0);
    }
}
