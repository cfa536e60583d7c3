//! Integration tests for the end-to-end merge flow.

use std::sync::Arc;

use pdfdeck::events::{ChannelSink, MemorySink, Severity, UiEvent};
use pdfdeck::session::MergeSession;

use crate::common::{page_count, pdf_source, quick_settings};

#[tokio::test]
async fn test_merge_two_single_page_documents() {
    let sink = Arc::new(MemorySink::new());
    let mut session = MergeSession::new(quick_settings(), sink.clone());

    session.add_files(vec![pdf_source("first.pdf", 1), pdf_source("second.pdf", 1)]);
    let output = session.merge().await.unwrap();

    assert_eq!(page_count(&output.bytes), 2);
    assert_eq!(output.statistics.files_merged, 2);
    assert!(output.suggested_filename.starts_with("Merged_PDF_"));
    assert!(output.suggested_filename.ends_with(".pdf"));

    // Progress reaches 100 exactly once per run.
    let completions = sink
        .progress_updates()
        .iter()
        .filter(|u| u.percent == 100.0)
        .count();
    assert_eq!(completions, 1);

    // The list resets after the run.
    assert!(session.files().is_empty());
}

#[tokio::test]
async fn test_merge_preserves_file_order_in_output() {
    let sink = Arc::new(MemorySink::new());
    let mut session = MergeSession::new(quick_settings(), sink);

    session.add_files(vec![
        pdf_source("three.pdf", 3),
        pdf_source("two.pdf", 2),
        pdf_source("one.pdf", 1),
    ]);

    let output = session.merge().await.unwrap();
    assert_eq!(output.statistics.files_merged, 3);
    assert_eq!(output.statistics.total_pages, 6);
    assert_eq!(page_count(&output.bytes), 6);
}

#[tokio::test]
async fn test_event_stream_for_a_front_end() {
    let (sink, mut rx) = ChannelSink::channel();
    let mut session = MergeSession::new(quick_settings(), Arc::new(sink));

    session.add_files(vec![pdf_source("a.pdf", 1), pdf_source("b.pdf", 1)]);
    session.merge().await.unwrap();

    let mut saw_state = false;
    let mut saw_progress = false;
    let mut saw_success = false;

    while let Ok(event) = rx.try_recv() {
        // Every event serializes for a web view.
        assert!(event.to_json().is_ok());

        match event {
            UiEvent::StateChanged(_) => saw_state = true,
            UiEvent::Progress(_) => saw_progress = true,
            UiEvent::Notification(n) if n.severity == Severity::Success => {
                saw_success = true;
            }
            UiEvent::Notification(_) => {}
        }
    }

    assert!(saw_state);
    assert!(saw_progress);
    assert!(saw_success);
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let sink = Arc::new(MemorySink::new());
    let mut session = MergeSession::new(quick_settings(), sink.clone());

    session.add_files(vec![
        pdf_source("a.pdf", 1),
        pdf_source("b.pdf", 1),
        pdf_source("c.pdf", 1),
        pdf_source("d.pdf", 1),
    ]);
    session.merge().await.unwrap();

    let updates = sink.progress_updates();
    assert!(!updates.is_empty());
    for pair in updates.windows(2) {
        assert!(pair[0].percent <= pair[1].percent);
    }
}
