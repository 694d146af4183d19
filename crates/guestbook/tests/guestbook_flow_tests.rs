//! End-to-end guestbook flow tests

use guestbook::persistence::DEFAULT_SLOT_KEY;
use guestbook::surface::{FixedAnswer, RecordingSurface, SurfaceEvent};
use guestbook::*;

type TestGuestbook = Guestbook<Storage, RecordingSurface>;

fn open() -> TestGuestbook {
    let store = GuestStore::new(Storage::open_in_memory().unwrap(), DEFAULT_SLOT_KEY);
    Guestbook::open(store, RecordingSurface::new(), GuestbookOptions::default())
}

fn remove_db(path: &std::path::Path) {
    let _ = std::fs::remove_file(path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}

fn slot(guestbook: &TestGuestbook) -> Option<String> {
    guestbook
        .store()
        .backend()
        .read_slot(DEFAULT_SLOT_KEY)
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
// Sign, filter, delete
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_sign_filter_delete() {
    let mut guestbook = open();
    assert!(guestbook.records().is_empty());
    assert_eq!(slot(&guestbook), None);

    let outcome = guestbook.add(&GuestForm::new("Ana", "Hi", false)).unwrap();
    let AddOutcome::Added(id) = outcome else {
        panic!("expected Ana to be added");
    };

    let persisted: serde_json::Value = serde_json::from_str(&slot(&guestbook).unwrap()).unwrap();
    let entries = persisted.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "Ana");
    assert_eq!(entries[0]["message"], "Hi");
    assert_eq!(entries[0]["attended"], false);
    assert!(entries[0]["timestamp"].as_str().unwrap().ends_with('Z'));

    guestbook.search("an");
    let view = guestbook.surface().last_view().unwrap();
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0].name, "Ana");
    assert_eq!(view.rows()[0].delete.target, id);

    guestbook.delete(&id).unwrap();
    assert!(guestbook.records().is_empty());
    assert_eq!(slot(&guestbook).as_deref(), Some("[]"));
    assert!(guestbook.surface().last_view().unwrap().is_empty());
}

#[test]
fn test_filter_that_matches_nothing_shows_placeholder() {
    let mut guestbook = open();
    guestbook.add(&GuestForm::new("Ana", "Hi", false)).unwrap();

    guestbook.search("zzz");
    assert_eq!(
        guestbook.surface().last_view(),
        Some(&GuestbookView::Empty {
            placeholder: "No visitors found"
        })
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Persistence across sessions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_reopen_from_database_file() {
    let path = std::env::temp_dir().join(format!(
        "guestbook_flow_{}.db",
        std::process::id()
    ));
    remove_db(&path);

    let ana = {
        let store = GuestStore::new(Storage::open(&path).unwrap(), DEFAULT_SLOT_KEY);
        let mut guestbook =
            Guestbook::open(store, RecordingSurface::new(), GuestbookOptions::default());
        guestbook.add(&GuestForm::new("Budi", "Halo", false)).unwrap();
        let AddOutcome::Added(ana) = guestbook.add(&GuestForm::new("Ana", "Hi", false)).unwrap()
        else {
            panic!("expected Ana to be added");
        };
        guestbook.toggle_attendance(&ana).unwrap();
        ana
    };

    let store = GuestStore::new(Storage::open(&path).unwrap(), DEFAULT_SLOT_KEY);
    let guestbook = Guestbook::open(store, RecordingSurface::new(), GuestbookOptions::default());
    let names: Vec<&str> = guestbook.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Budi"]);
    assert!(guestbook.get(&ana).unwrap().attended);
    drop(guestbook);

    remove_db(&path);
    assert!(!path.exists());
    assert!(!path.with_extension("db-wal").exists());
}

#[test]
fn test_clear_all_with_injected_answers() {
    let mut guestbook = open();
    guestbook.add(&GuestForm::new("Ana", "Hi", false)).unwrap();
    guestbook.add(&GuestForm::new("Budi", "Halo", true)).unwrap();

    assert_eq!(
        guestbook.clear_all(&mut FixedAnswer(false)).unwrap(),
        ClearOutcome::Declined
    );
    assert_eq!(guestbook.records().len(), 2);

    assert_eq!(
        guestbook.clear_all(&mut FixedAnswer(true)).unwrap(),
        ClearOutcome::Cleared(2)
    );
    assert_eq!(slot(&guestbook), None);
    assert_eq!(
        guestbook.surface().events.last(),
        Some(&SurfaceEvent::FilterCleared)
    );
}
