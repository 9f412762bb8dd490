use anyhow::Result;
use notekeep::db::query::{self, NoteFilter};
use notekeep::{Database, NoteError, NoteService, TagReuse};
use tempfile::tempdir;

#[test]
fn notes_survive_reopening_the_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("notes.db");

    let first_id = {
        let service = NoteService::new(Database::open(&path)?);
        let note = service.add_note("Persisted", "still here", "keep")?;
        service.database().close()?;
        note.id()
    };

    let service = NoteService::new(Database::open(&path)?);
    let notes = service.list_all_notes()?;

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id(), first_id);
    assert!(notes[0].has_tag("keep"));
    Ok(())
}

#[test]
fn ids_are_not_reused_across_sessions() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("notes.db");

    let deleted = {
        let service = NoteService::new(Database::open(&path)?);
        service.add_note("One", "1", "")?;
        let two = service.add_note("Two", "2", "")?;
        service.delete_note(two.id())?;
        service.database().close()?;
        two.id()
    };

    let service = NoteService::new(Database::open(&path)?);
    let three = service.add_note("Three", "3", "")?;

    assert!(three.id() > deleted);
    Ok(())
}

#[test]
fn closed_file_database_refuses_work() -> Result<()> {
    let dir = tempdir()?;
    let db = Database::open(dir.path().join("notes.db"))?;

    db.close()?;
    db.close()?;

    assert!(db.is_closed());
    assert!(matches!(db.open_session(), Err(NoteError::Connection(_))));
    Ok(())
}

#[test]
fn sessions_read_through_the_query_module() -> Result<()> {
    let db = Database::in_memory()?;
    let service = NoteService::new(db);
    service.add_note("Read me", "body", "")?;

    let session = service.database().open_session()?;
    let notes = query::notes(&session, &NoteFilter::All)?;

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title(), "Read me");
    Ok(())
}

#[test]
fn fresh_policy_persists_separate_tags() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("notes.db");

    let service = NoteService::with_tag_reuse(Database::open(&path)?, TagReuse::Fresh);
    let first = service.add_note("First", "a", "shared")?;
    let second = service.add_note("Second", "b", "shared")?;
    service.database().close()?;

    let service = NoteService::new(Database::open(&path)?);
    let shared = service.search_notes("shared")?;

    assert_eq!(
        shared.iter().map(|n| n.id()).collect::<Vec<_>>(),
        vec![first.id(), second.id()]
    );
    Ok(())
}

#[test]
fn concurrent_writers_are_serialized() -> Result<()> {
    let service = NoteService::new(Database::in_memory()?);

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let service = &service;
            scope.spawn(move || {
                for i in 0..10 {
                    service
                        .add_note(&format!("w{worker} n{i}"), "body", "")
                        .expect("add should succeed");
                }
            });
        }
    });

    assert_eq!(service.list_all_notes()?.len(), 40);
    Ok(())
}
