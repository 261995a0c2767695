use driftnote_core::db::{open_db, open_db_in_memory};
use driftnote_core::repo::workspace_store::{NOTES_KEY, PARTICLES_KEY, THEME_KEY};
use driftnote_core::{
    KvRepository, MemoryKvRepository, Note, NoteColor, SqliteKvRepository, Theme, WorkspaceStore,
};
use uuid::Uuid;

fn sample_notes() -> Vec<Note> {
    let mut first = Note::new(Uuid::new_v4(), 120, 80, NoteColor::Peach, 3);
    first.text = "call the plumber\nbefore friday".to_string();
    first.pinned = true;

    let mut second = Note::new(Uuid::new_v4(), 37, 411, NoteColor::Sage, 9);
    second.minimized = true;
    second.prev_height = Some(150);
    second.prev_min_height = Some(110);

    vec![first, second]
}

#[test]
fn save_then_load_roundtrips_in_memory() {
    let mut store = WorkspaceStore::new(MemoryKvRepository::new());
    let notes = sample_notes();

    store.save_notes(&notes).unwrap();
    assert_eq!(store.load_notes(), notes);
}

#[test]
fn save_then_load_roundtrips_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.db");
    let notes = sample_notes();

    {
        let kv = SqliteKvRepository::try_new(open_db(&path).unwrap()).unwrap();
        let mut store = WorkspaceStore::new(kv);
        store.save_notes(&notes).unwrap();
        store.save_theme(Theme::Light).unwrap();
        store.save_particles_enabled(false).unwrap();
    }

    let kv = SqliteKvRepository::try_new(open_db(&path).unwrap()).unwrap();
    let store = WorkspaceStore::new(kv);
    assert_eq!(store.load_notes(), notes);
    assert_eq!(store.load_theme(), Theme::Light);
    assert!(!store.load_particles_enabled());
}

#[test]
fn save_overwrites_whole_collection() {
    let kv = SqliteKvRepository::try_new(open_db_in_memory().unwrap()).unwrap();
    let mut store = WorkspaceStore::new(kv);
    let notes = sample_notes();

    store.save_notes(&notes).unwrap();
    store.save_notes(&notes[..1]).unwrap();
    assert_eq!(store.load_notes(), notes[..1].to_vec());

    store.save_notes(&[]).unwrap();
    assert!(store.load_notes().is_empty());
}

#[test]
fn absent_document_loads_empty() {
    let store = WorkspaceStore::new(MemoryKvRepository::new());
    assert!(store.load_notes().is_empty());
}

#[test]
fn corrupt_document_loads_empty() {
    let mut kv = MemoryKvRepository::new();
    kv.set(NOTES_KEY, "[{\"id\": 17, \"text\": ").unwrap();
    let store = WorkspaceStore::new(kv);
    assert!(store.load_notes().is_empty());

    let mut kv = MemoryKvRepository::new();
    kv.set(NOTES_KEY, "{\"not\": \"a list\"}").unwrap();
    let store = WorkspaceStore::new(kv);
    assert!(store.load_notes().is_empty());
}

#[test]
fn document_is_a_json_array_with_external_keys() {
    let mut store = WorkspaceStore::new(MemoryKvRepository::new());
    let notes = sample_notes();
    store.save_notes(&notes).unwrap();

    let raw = store.kv_mut().get(NOTES_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    for key in [
        "id",
        "text",
        "top",
        "left",
        "width",
        "height",
        "color",
        "zIndex",
        "pinned",
        "minimized",
        "_prevHeight",
        "_prevMinHeight",
    ] {
        assert!(items[0].get(key).is_some(), "missing key {key}");
    }
    assert_eq!(items[1]["color"], "#d0f4de");
}

#[test]
fn preferences_default_and_parse_stored_strings() {
    let store = WorkspaceStore::new(MemoryKvRepository::new());
    let prefs = store.load_preferences();
    assert_eq!(prefs.theme, Theme::Dark);
    assert!(prefs.particles_enabled);

    let mut kv = MemoryKvRepository::new();
    kv.set(THEME_KEY, "light").unwrap();
    kv.set(PARTICLES_KEY, "anything").unwrap();
    let store = WorkspaceStore::new(kv);
    assert_eq!(store.load_theme(), Theme::Light);
    assert!(store.load_particles_enabled());

    let mut kv = MemoryKvRepository::new();
    kv.set(PARTICLES_KEY, "false").unwrap();
    assert!(!WorkspaceStore::new(kv).load_particles_enabled());
}
