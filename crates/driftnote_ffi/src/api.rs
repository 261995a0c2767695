//! FFI use-case API for the Flutter host.
//!
//! # Responsibility
//! - Expose one workspace session to Dart via FRB.
//! - Translate host input (ids, labels, keys) into core events.
//! - Hand recorded render commands and particle draw lists back to the host.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - At most one session is open; `workspace_open` replaces the previous one.
//! - Each call holds the session lock for the duration of one handler.

use driftnote_core::db::open_db;
use driftnote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DrawList, DrawOp, ExitTransition, Key, KeyEvent, MemoryKvRepository, Modifiers, Note, NoteId,
    NotePatch, NoteRegion, NoteSeed, ParticleField, Point, PointerTarget, RecordingRenderer,
    RenderCommand, Shortcut, SqliteKvRepository, TransientVisual, WorkspaceController,
    WorkspaceStore, EXIT_ANIMATION_MS,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use uuid::Uuid;

const DB_FILE_NAME: &str = "driftnote.sqlite3";
const DB_PATH_ENV: &str = "DRIFTNOTE_DB_PATH";
const NOT_OPEN: &str = "workspace is not open";

static SESSION: OnceLock<Mutex<Option<Session>>> = OnceLock::new();

type Controller = WorkspaceController<RecordingRenderer>;

struct Session {
    controller: Controller,
    field: ParticleField,
    storage: &'static str,
}

impl Session {
    fn snapshot(&self, message: impl Into<String>) -> WorkspaceSnapshot {
        let prefs = self.controller.preferences();
        WorkspaceSnapshot {
            ok: true,
            notes: self
                .controller
                .workspace()
                .notes()
                .iter()
                .map(to_note_view)
                .collect(),
            selected_id: self.controller.selected().map(|id| id.to_string()),
            theme: prefs.theme.as_str().to_string(),
            particles_enabled: prefs.particles_enabled,
            storage: self.storage.to_string(),
            message: message.into(),
        }
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Persisted fields of one note, flattened for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub id: String,
    pub text: String,
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
    /// CSS hex color, e.g. `#fff8b0`.
    pub color: String,
    pub z_index: i64,
    pub pinned: bool,
    pub minimized: bool,
}

/// Full workspace state for initial paint and resync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSnapshot {
    /// `false` when no session is open.
    pub ok: bool,
    /// Notes in render order.
    pub notes: Vec<NoteView>,
    pub selected_id: Option<String>,
    /// `dark|light`.
    pub theme: String,
    pub particles_enabled: bool,
    /// `sqlite|memory`; `memory` means the database could not be opened.
    pub storage: String,
    pub message: String,
}

impl WorkspaceSnapshot {
    fn closed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            notes: Vec::new(),
            selected_id: None,
            theme: String::new(),
            particles_enabled: false,
            storage: String::new(),
            message: message.into(),
        }
    }
}

/// Result envelope for per-note operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Affected note; for duplicates this is the new copy.
    pub note_id: Option<String>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: NoteId) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Drag tilt and shadow to apply to a rendered note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualView {
    pub tilt_x_deg: f64,
    pub tilt_y_deg: f64,
    pub shadow_x: f64,
    pub shadow_y: f64,
    pub shadow_blur: f64,
    pub shadow_alpha: f64,
    pub scale: f64,
}

/// One instruction for the Dart note layer.
///
/// `kind` is one of `render|position|size|z_index|color|pinned|collapse|
/// expand|visual|remove`; only the fields that kind uses are set.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommandView {
    pub handle: u64,
    pub kind: String,
    pub note: Option<NoteView>,
    pub top: Option<i32>,
    pub left: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub min_height: Option<i32>,
    pub z_index: Option<i64>,
    pub color: Option<String>,
    pub pinned: Option<bool>,
    pub visual: Option<VisualView>,
    /// For `remove`: whether the exit animation should play.
    pub animated: Option<bool>,
    /// For an animated `remove`: how long the fade runs before the host
    /// calls `exit_animations_finished`.
    pub exit_ms: Option<u32>,
}

impl RenderCommandView {
    fn new(handle: u64, kind: &str) -> Self {
        Self {
            handle,
            kind: kind.to_string(),
            note: None,
            top: None,
            left: None,
            width: None,
            height: None,
            min_height: None,
            z_index: None,
            color: None,
            pinned: None,
            visual: None,
            animated: None,
            exit_ms: None,
        }
    }
}

/// One particle-layer drawing call. `kind` is `background` or `disc`.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

/// Opens (or reopens) the workspace session.
///
/// Input semantics:
/// - `db_path`: SQLite file; falls back to `DRIFTNOTE_DB_PATH`, then to a
///   file in the system temp directory.
/// - `viewport_width`/`viewport_height`: particle canvas size in pixels.
///
/// # FFI contract
/// - Never fails: when the database cannot be opened the session runs on an
///   in-memory store and `storage` reports `memory`.
/// - Render commands for every loaded note are queued for
///   [`drain_render_commands`].
#[flutter_rust_bridge::frb(sync)]
pub fn workspace_open(
    db_path: Option<String>,
    viewport_width: f64,
    viewport_height: f64,
) -> WorkspaceSnapshot {
    let path = resolve_db_path(db_path);
    let (store, storage) = match open_store(&path) {
        Ok(store) => (store, "sqlite"),
        Err(err) => {
            warn!(
                "event=workspace_open module=ffi status=fallback storage=memory path={} error={}",
                path.display(),
                err
            );
            (WorkspaceStore::new(MemoryKvRepository::new()), "memory")
        }
    };

    let session = Session {
        controller: WorkspaceController::open(store, RecordingRenderer::new()),
        field: ParticleField::new(viewport_width.max(0.0), viewport_height.max(0.0)),
        storage,
    };
    let snapshot = session.snapshot("Workspace opened.");
    *lock_session() = Some(session);
    info!(
        "event=workspace_open module=ffi status=ok storage={} path={}",
        storage,
        path.display()
    );
    snapshot
}

/// Drops the open session, if any. Always succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn workspace_close() {
    if lock_session().take().is_some() {
        info!("event=workspace_close module=ffi status=ok");
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn workspace_snapshot() -> WorkspaceSnapshot {
    with_session(|session| session.snapshot("OK"))
        .unwrap_or_else(|err| WorkspaceSnapshot::closed(err))
}

/// Creates a note at a random spawn position.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(text: Option<String>) -> NoteActionResponse {
    let seed = NoteSeed {
        text: text.unwrap_or_default(),
        position: None,
    };
    match with_session(|session| session.controller.create_note_with(seed)) {
        Ok(note) => NoteActionResponse::success("Note created.", note.id),
        Err(err) => NoteActionResponse::failure(format!("note_create failed: {err}")),
    }
}

/// Duplicates a note; `note_id` in the response is the copy.
#[flutter_rust_bridge::frb(sync)]
pub fn note_duplicate(note_id: String) -> NoteActionResponse {
    note_action("note_duplicate", &note_id, |controller, id| {
        controller
            .duplicate_note(id)
            .map(|copy| (copy.id, "Note duplicated.".to_string()))
    })
}

/// Deletes a note from its own control; the host plays the exit animation.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    note_action("note_delete", &note_id, |controller, id| {
        controller
            .delete_note(id)
            .then(|| (id, "Note deleted.".to_string()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_recolor(note_id: String) -> NoteActionResponse {
    note_action("note_recolor", &note_id, |controller, id| {
        controller
            .recolor_note(id)
            .map(|color| (id, format!("Color set to {}.", color.hex())))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_toggle_pin(note_id: String) -> NoteActionResponse {
    note_action("note_toggle_pin", &note_id, |controller, id| {
        controller.toggle_pin(id).map(|pinned| {
            let message = if pinned { "Note pinned." } else { "Note unpinned." };
            (id, message.to_string())
        })
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_toggle_minimize(note_id: String) -> NoteActionResponse {
    note_action("note_toggle_minimize", &note_id, |controller, id| {
        controller.toggle_minimize(id).map(|minimized| {
            let message = if minimized {
                "Note minimized."
            } else {
                "Note restored."
            };
            (id, message.to_string())
        })
    })
}

/// Replaces note text as typed by the user.
#[flutter_rust_bridge::frb(sync)]
pub fn note_set_text(note_id: String, text: String) -> NoteActionResponse {
    note_action("note_set_text", &note_id, |controller, id| {
        controller
            .set_text(id, text)
            .then(|| (id, "Text saved.".to_string()))
    })
}

/// Reports a size change the host layout made outside of a resize gesture.
#[flutter_rust_bridge::frb(sync)]
pub fn note_box_resized(note_id: String, width: i32, height: i32) -> NoteActionResponse {
    note_action("note_box_resized", &note_id, |controller, id| {
        controller.workspace().get(id)?;
        let message = if controller.on_box_resized(id, width, height) {
            "Size captured."
        } else {
            "Size unchanged."
        };
        Some((id, message.to_string()))
    })
}

/// Forwards a pointer-down resolved by the host hit test.
///
/// Input semantics:
/// - `note_id`: `None` when the pointer landed on the background.
/// - `region`: `body|text|button|resize`.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn pointer_down(x: f64, y: f64, note_id: Option<String>, region: String) -> String {
    let target = match note_id {
        None => PointerTarget::Background,
        Some(raw) => {
            let id = match parse_note_id(&raw) {
                Ok(id) => id,
                Err(err) => return err,
            };
            let Some(region) = NoteRegion::from_label(&region) else {
                return format!("unsupported pointer region: {region}");
            };
            PointerTarget::Note { id, region }
        }
    };
    with_session(|session| session.controller.pointer_down(Point::new(x, y), target))
        .err()
        .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn pointer_move(x: f64, y: f64) -> String {
    with_session(|session| session.controller.pointer_move(Point::new(x, y)))
        .err()
        .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn pointer_up(x: f64, y: f64) -> String {
    with_session(|session| session.controller.pointer_up(Point::new(x, y)))
        .err()
        .unwrap_or_default()
}

/// Forwards a key press.
///
/// Input semantics:
/// - `key`: `Delete`, a single character, or any other key name.
///
/// Returns the applied shortcut (`delete|duplicate`), if any.
#[flutter_rust_bridge::frb(sync)]
pub fn key_down(key: String, ctrl: bool, shift: bool, alt: bool, meta: bool) -> Option<String> {
    let event = KeyEvent {
        key: parse_key(&key),
        modifiers: Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        },
    };
    let shortcut = with_session(|session| session.controller.handle_key(&event))
        .ok()
        .flatten()?;
    Some(shortcut_label(shortcut).to_string())
}

/// Flips the theme and returns the new one (`dark|light`).
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_theme() -> Option<String> {
    with_session(|session| session.controller.toggle_theme().as_str().to_string()).ok()
}

/// Flips the particle layer and returns whether it is now enabled.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_particles() -> Option<bool> {
    with_session(|session| session.controller.toggle_particles()).ok()
}

/// Re-initializes the particle field for a new canvas size.
#[flutter_rust_bridge::frb(sync)]
pub fn viewport_resized(width: f64, height: f64) -> String {
    with_session(|session| session.field.resize(width.max(0.0), height.max(0.0)))
        .err()
        .unwrap_or_default()
}

/// Advances the particle field one frame and returns what to paint.
///
/// Empty when particles are disabled or no session is open.
#[flutter_rust_bridge::frb(sync)]
pub fn particles_frame() -> Vec<DrawCommand> {
    with_session(|session| {
        let centers = session.controller.note_centers();
        let prefs = session.controller.preferences();
        let mut canvas = DrawList::new();
        session
            .field
            .frame(&centers, prefs.theme, prefs.particles_enabled, &mut canvas);
        canvas.into_ops().into_iter().map(to_draw_command).collect()
    })
    .unwrap_or_default()
}

/// Returns and clears render commands queued since the last drain.
#[flutter_rust_bridge::frb(sync)]
pub fn drain_render_commands() -> Vec<RenderCommandView> {
    with_session(|session| {
        session
            .controller
            .renderer_mut()
            .drain_commands()
            .into_iter()
            .map(to_render_command_view)
            .collect()
    })
    .unwrap_or_default()
}

/// Tells the core that every pending exit animation has finished.
///
/// Returns an empty string on success, otherwise the error message.
#[flutter_rust_bridge::frb(sync)]
pub fn exit_animations_finished() -> String {
    with_session(|session| session.controller.renderer_mut().complete_exit_animations())
        .err()
        .unwrap_or_default()
}

fn lock_session() -> MutexGuard<'static, Option<Session>> {
    SESSION
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> Result<T, String> {
    let mut guard = lock_session();
    match guard.as_mut() {
        Some(session) => Ok(f(session)),
        None => Err(NOT_OPEN.to_string()),
    }
}

fn note_action(
    op: &str,
    note_id: &str,
    action: impl FnOnce(&mut Controller, NoteId) -> Option<(NoteId, String)>,
) -> NoteActionResponse {
    let id = match parse_note_id(note_id) {
        Ok(id) => id,
        Err(err) => return NoteActionResponse::failure(format!("{op} failed: {err}")),
    };
    match with_session(|session| action(&mut session.controller, id)) {
        Ok(Some((affected, message))) => NoteActionResponse::success(message, affected),
        Ok(None) => NoteActionResponse::failure(format!("{op} failed: note {id} not found")),
        Err(err) => NoteActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn resolve_db_path(db_path: Option<String>) -> PathBuf {
    let explicit = db_path
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty());
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DB_FILE_NAME)
}

fn open_store(path: &Path) -> Result<WorkspaceStore, String> {
    let conn = open_db(path).map_err(|err| format!("workspace DB open failed: {err}"))?;
    let kv = SqliteKvRepository::try_new(conn)
        .map_err(|err| format!("workspace store init failed: {err}"))?;
    Ok(WorkspaceStore::new(kv))
}

fn parse_note_id(raw: &str) -> Result<NoteId, String> {
    Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid note id `{raw}`: {err}"))
}

fn parse_key(raw: &str) -> Key {
    if raw.eq_ignore_ascii_case("delete") {
        return Key::Delete;
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Key::Character(c),
        _ => Key::Other,
    }
}

fn shortcut_label(shortcut: Shortcut) -> &'static str {
    match shortcut {
        Shortcut::Delete => "delete",
        Shortcut::Duplicate => "duplicate",
    }
}

fn to_note_view(note: &Note) -> NoteView {
    NoteView {
        id: note.id.to_string(),
        text: note.text.clone(),
        top: note.top,
        left: note.left,
        width: note.width,
        height: note.height,
        color: note.color.hex().to_string(),
        z_index: note.z_index,
        pinned: note.pinned,
        minimized: note.minimized,
    }
}

fn to_visual_view(visual: TransientVisual) -> VisualView {
    VisualView {
        tilt_x_deg: visual.tilt_x_deg,
        tilt_y_deg: visual.tilt_y_deg,
        shadow_x: visual.shadow_x,
        shadow_y: visual.shadow_y,
        shadow_blur: visual.shadow_blur,
        shadow_alpha: visual.shadow_alpha,
        scale: visual.scale,
    }
}

fn to_render_command_view(command: RenderCommand) -> RenderCommandView {
    match command {
        RenderCommand::Render { handle, note } => RenderCommandView {
            note: Some(to_note_view(&note)),
            ..RenderCommandView::new(handle, "render")
        },
        RenderCommand::Visual { handle, visual } => RenderCommandView {
            visual: Some(to_visual_view(visual)),
            ..RenderCommandView::new(handle, "visual")
        },
        RenderCommand::Remove { handle, exit } => {
            let animated = exit == ExitTransition::Animated;
            RenderCommandView {
                animated: Some(animated),
                exit_ms: animated.then_some(EXIT_ANIMATION_MS),
                ..RenderCommandView::new(handle, "remove")
            }
        }
        RenderCommand::Reflect { handle, patch } => match patch {
            NotePatch::Position { top, left } => RenderCommandView {
                top: Some(top),
                left: Some(left),
                ..RenderCommandView::new(handle, "position")
            },
            NotePatch::Size { width, height } => RenderCommandView {
                width: Some(width),
                height: Some(height),
                ..RenderCommandView::new(handle, "size")
            },
            NotePatch::ZIndex(z_index) => RenderCommandView {
                z_index: Some(z_index),
                ..RenderCommandView::new(handle, "z_index")
            },
            NotePatch::Color(color) => RenderCommandView {
                color: Some(color.hex().to_string()),
                ..RenderCommandView::new(handle, "color")
            },
            NotePatch::Pinned(pinned) => RenderCommandView {
                pinned: Some(pinned),
                ..RenderCommandView::new(handle, "pinned")
            },
            NotePatch::Collapse => RenderCommandView::new(handle, "collapse"),
            NotePatch::Expand { height, min_height } => RenderCommandView {
                height: Some(height),
                min_height,
                ..RenderCommandView::new(handle, "expand")
            },
        },
    }
}

fn to_draw_command(op: DrawOp) -> DrawCommand {
    match op {
        DrawOp::Background(color) => DrawCommand {
            kind: "background".to_string(),
            x: 0.0,
            y: 0.0,
            radius: 0.0,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha: color.a,
        },
        DrawOp::Disc {
            center,
            radius,
            color,
        } => DrawCommand {
            kind: "disc".to_string(),
            x: center.x,
            y: center.y,
            radius,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha: color.a,
        },
    }
}
