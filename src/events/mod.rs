//! Event surface consumed by the presentation layer.
//!
//! The core never touches rendering. Every observable change is expressed
//! as a typed event pushed into an [`EventSink`] the embedder supplies:
//!
//! - [`FileListState`] - the ordered file list after a mutation
//! - [`ProgressUpdate`] - merge progress (percent + status text)
//! - [`Notification`] - transient user messages tagged with a [`Severity`]
//!
//! Payloads serialize to camelCase JSON so a web-view front end can
//! consume them directly.
//!
//! # Examples
//!
//! ```
//! use pdfdeck::events::{ChannelSink, EventSink, Notification};
//!
//! let (sink, mut rx) = ChannelSink::channel();
//! sink.notify(&Notification::success("2 PDF file(s) added"));
//! assert!(rx.try_recv().is_ok());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// An operation completed as requested.
    Success,
    /// The request was rejected or partially honored; nothing broke.
    Warning,
    /// An operation failed.
    Error,
}

/// A transient, dismissable user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Severity tag controlling presentation.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Notification {
    /// Advisory display duration before a front end auto-dismisses.
    pub const DISPLAY_FOR: Duration = Duration::from_secs(3);

    /// Create a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// Create a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Merge progress at a phase boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Progress in percent, 0.0 to 100.0. Fractional during the
    /// per-file loop.
    pub percent: f32,
    /// Human-readable status line.
    pub status: String,
}

impl ProgressUpdate {
    /// Create a progress update.
    pub fn new(percent: f32, status: impl Into<String>) -> Self {
        Self {
            percent,
            status: status.into(),
        }
    }

    /// Percent rounded for display.
    pub fn rounded_percent(&self) -> u8 {
        self.percent.round().clamp(0.0, 100.0) as u8
    }
}

/// One entry of the rendered file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    /// Zero-based position in the list.
    pub position: usize,
    /// Display name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last-modified timestamp.
    pub last_modified: DateTime<Utc>,
}

/// Snapshot of the file list after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListState {
    /// Number of files in the list.
    pub count: usize,
    /// Entries in merge order.
    pub files: Vec<FileSummary>,
}

/// Envelope for forwarding events over a channel or wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UiEvent {
    /// The file list changed.
    StateChanged(FileListState),
    /// Merge progress advanced.
    Progress(ProgressUpdate),
    /// A notification should be shown.
    Notification(Notification),
}

impl UiEvent {
    /// Serialize the event to a JSON string for a web-view front end.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Subscription interface implemented by the presentation layer.
pub trait EventSink: Send + Sync {
    /// The file list changed; re-render it.
    fn state_changed(&self, state: &FileListState);

    /// Merge progress advanced.
    fn progress(&self, update: &ProgressUpdate);

    /// Show a transient notification.
    fn notify(&self, notification: &Notification);
}

/// Sink that discards every event. Useful for headless use and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn state_changed(&self, _state: &FileListState) {}

    fn progress(&self, _update: &ProgressUpdate) {}

    fn notify(&self, _notification: &Notification) {}
}

/// Sink that buffers events in memory.
///
/// Lets embedders without an event loop (and tests) inspect what the core
/// emitted, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<UiEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far, in emission order.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Only the notifications recorded so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Notification(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Only the progress updates recorded so far.
    pub fn progress_updates(&self) -> Vec<ProgressUpdate> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// The most recent file-list snapshot, if any mutation happened.
    pub fn last_state(&self) -> Option<FileListState> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|event| match event {
                UiEvent::StateChanged(s) => Some(s),
                _ => None,
            })
    }

    fn push(&self, event: UiEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl EventSink for MemorySink {
    fn state_changed(&self, state: &FileListState) {
        self.push(UiEvent::StateChanged(state.clone()));
    }

    fn progress(&self, update: &ProgressUpdate) {
        self.push(UiEvent::Progress(update.clone()));
    }

    fn notify(&self, notification: &Notification) {
        self.push(UiEvent::Notification(notification.clone()));
    }
}

/// Sink that forwards events into a tokio channel.
///
/// Front ends driven by an event loop receive [`UiEvent`]s on the paired
/// receiver. Events emitted after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver it feeds.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }
}

impl EventSink for ChannelSink {
    fn state_changed(&self, state: &FileListState) {
        self.send(UiEvent::StateChanged(state.clone()));
    }

    fn progress(&self, update: &ProgressUpdate) {
        self.send(UiEvent::Progress(update.clone()));
    }

    fn notify(&self, notification: &Notification) {
        self.send(UiEvent::Notification(notification.clone()));
    }
}
