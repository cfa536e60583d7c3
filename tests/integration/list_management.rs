//! Integration tests for file-list management through the session API.

use std::sync::Arc;

use pdfdeck::events::MemorySink;
use pdfdeck::session::MergeSession;

use crate::common::{pdf_source, quick_settings};

fn session() -> (MergeSession, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (MergeSession::new(quick_settings(), sink.clone()), sink)
}

fn names(session: &MergeSession) -> Vec<String> {
    session.files().iter().map(|f| f.name.clone()).collect()
}

#[tokio::test]
async fn test_selection_order_then_sort() {
    let (mut session, _) = session();

    // Selection order is kept as-is until the user sorts.
    session.add_files(vec![pdf_source("B.pdf", 1), pdf_source("A.pdf", 1)]);
    assert_eq!(names(&session), vec!["B.pdf", "A.pdf"]);

    session.sort_by_name();
    assert_eq!(names(&session), vec!["A.pdf", "B.pdf"]);
}

#[tokio::test]
async fn test_adding_same_file_twice_keeps_one_entry() {
    let (mut session, sink) = session();

    session.add_files(vec![pdf_source("A.pdf", 1)]);
    let second = session.add_files(vec![pdf_source("A.pdf", 1)]);

    assert_eq!(second.duplicates, 1);
    assert_eq!(second.added, 0);
    assert_eq!(session.files().len(), 1);
    assert!(
        sink.notifications()
            .last()
            .unwrap()
            .message
            .contains("already in the list")
    );
}

#[tokio::test]
async fn test_drag_to_end_reorders_like_a_splice() {
    let (mut session, _) = session();
    session.add_files(vec![
        pdf_source("A.pdf", 1),
        pdf_source("B.pdf", 1),
        pdf_source("C.pdf", 1),
    ]);

    session.move_file(0, 2).unwrap();
    assert_eq!(names(&session), vec!["B.pdf", "C.pdf", "A.pdf"]);
}

#[tokio::test]
async fn test_remove_updates_positions() {
    let (mut session, sink) = session();
    session.add_files(vec![
        pdf_source("A.pdf", 1),
        pdf_source("B.pdf", 1),
        pdf_source("C.pdf", 1),
    ]);

    session.remove_file(0).unwrap();

    let state = sink.last_state().unwrap();
    assert_eq!(state.count, 2);
    assert_eq!(state.files[0].name, "B.pdf");
    assert_eq!(state.files[0].position, 0);
    assert_eq!(state.files[1].name, "C.pdf");
    assert_eq!(state.files[1].position, 1);
}

#[tokio::test]
async fn test_up_down_buttons() {
    let (mut session, _) = session();
    session.add_files(vec![
        pdf_source("A.pdf", 1),
        pdf_source("B.pdf", 1),
        pdf_source("C.pdf", 1),
    ]);

    session.move_down(0).unwrap();
    assert_eq!(names(&session), vec!["B.pdf", "A.pdf", "C.pdf"]);

    session.move_up(2).unwrap();
    assert_eq!(names(&session), vec!["B.pdf", "C.pdf", "A.pdf"]);

    // Boundary presses do nothing.
    session.move_up(0).unwrap();
    session.move_down(2).unwrap();
    assert_eq!(names(&session), vec!["B.pdf", "C.pdf", "A.pdf"]);
}
