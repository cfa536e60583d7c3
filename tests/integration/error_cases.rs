//! Integration tests for rejection and failure behavior.

use std::sync::Arc;

use pdfdeck::PdfDeckError;
use pdfdeck::events::{MemorySink, Severity};
use pdfdeck::session::MergeSession;

use crate::common::{pdf_source, quick_settings, raw_source};

fn session() -> (MergeSession, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (MergeSession::new(quick_settings(), sink.clone()), sink)
}

#[tokio::test]
async fn test_non_pdf_selection_warns_and_adds_nothing() {
    let (mut session, sink) = session();

    let result = session.add_files(vec![raw_source("photo.png", "image/png", vec![1, 2])]);

    assert_eq!(result.added, 0);
    assert_eq!(result.rejected, 1);
    assert!(session.files().is_empty());

    let last = sink.notifications().pop().unwrap();
    assert_eq!(last.severity, Severity::Warning);
}

#[tokio::test]
async fn test_merge_with_too_few_files() {
    let (mut session, sink) = session();
    session.add_files(vec![pdf_source("only.pdf", 1)]);

    let err = session.merge().await.unwrap_err();
    assert!(matches!(err, PdfDeckError::InsufficientFiles { count: 1 }));

    let last = sink.notifications().pop().unwrap();
    assert_eq!(last.severity, Severity::Warning);
    assert!(last.message.contains("at least 2"));
}

#[tokio::test]
async fn test_corrupt_file_fails_whole_merge() {
    let (mut session, sink) = session();
    session.add_files(vec![
        pdf_source("good.pdf", 1),
        raw_source("corrupt.pdf", "application/pdf", b"%PDF-not really".to_vec()),
    ]);

    let err = session.merge().await.unwrap_err();
    assert!(matches!(err, PdfDeckError::FailedToLoadDocument { .. }));

    // Generic message to the user, never lopdf internals.
    let last = sink.notifications().pop().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert!(!last.message.contains("lopdf"));

    // The list survives for a retry.
    assert_eq!(session.files().len(), 2);
}

#[tokio::test]
async fn test_session_recovers_after_failure() {
    let (mut session, _) = session();
    session.add_files(vec![
        pdf_source("good.pdf", 1),
        raw_source("corrupt.pdf", "application/pdf", b"junk".to_vec()),
    ]);

    assert!(session.merge().await.is_err());

    session.remove_file(1).unwrap();
    session.add_files(vec![pdf_source("better.pdf", 2)]);

    let output = session.merge().await.unwrap();
    assert_eq!(output.statistics.total_pages, 3);
}

#[tokio::test]
async fn test_bad_indices_are_rejected() {
    let (mut session, _) = session();
    session.add_files(vec![pdf_source("a.pdf", 1)]);

    assert!(matches!(
        session.remove_file(3),
        Err(PdfDeckError::IndexOutOfRange { index: 3, len: 1 })
    ));
    assert!(session.move_file(0, 1).is_err());
    assert_eq!(session.files().len(), 1);
}
