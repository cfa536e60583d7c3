//! The composition root an embedder owns.
//!
//! [`MergeSession`] wires the file set, the merger and the shared event
//! sink together and exposes the full operation surface a front end
//! needs. It is a plain owned value: construct one per page or component
//! lifetime, hold it wherever the event loop lives, drop it when done.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::events::{EventSink, Notification};
use crate::fileset::{AddResult, FileSet, SelectedFile};
use crate::io::FileSource;
use crate::merge::{DocumentBackend, LopdfBackend, MergeOutput, MergeStatus, Merger};

/// A file set and a merger sharing one event sink.
pub struct MergeSession<B: DocumentBackend = LopdfBackend> {
    fileset: FileSet,
    merger: Merger<B>,
    sink: Arc<dyn EventSink>,
}

impl MergeSession<LopdfBackend> {
    /// Create a session backed by lopdf.
    pub fn new(settings: Settings, sink: Arc<dyn EventSink>) -> Self {
        Self::with_backend(LopdfBackend::new(), settings, sink)
    }
}

impl<B: DocumentBackend> MergeSession<B> {
    /// Create a session with a custom document backend.
    pub fn with_backend(backend: B, settings: Settings, sink: Arc<dyn EventSink>) -> Self {
        Self {
            fileset: FileSet::new(settings.clone(), sink.clone()),
            merger: Merger::with_backend(backend, settings),
            sink,
        }
    }

    /// Offer candidate files to the set. See [`FileSet::add`].
    pub fn add_files(&mut self, sources: Vec<Arc<dyn FileSource>>) -> AddResult {
        self.fileset.add(sources)
    }

    /// Remove the file at `index`. See [`FileSet::remove`].
    pub fn remove_file(&mut self, index: usize) -> Result<()> {
        self.fileset.remove(index)
    }

    /// Move the file at `from` to position `to`. See
    /// [`FileSet::move_file`].
    pub fn move_file(&mut self, from: usize, to: usize) -> Result<()> {
        self.fileset.move_file(from, to)
    }

    /// Move the file at `index` one position up. See
    /// [`FileSet::move_up`].
    pub fn move_up(&mut self, index: usize) -> Result<()> {
        self.fileset.move_up(index)
    }

    /// Move the file at `index` one position down. See
    /// [`FileSet::move_down`].
    pub fn move_down(&mut self, index: usize) -> Result<()> {
        self.fileset.move_down(index)
    }

    /// Sort the set by display name. See [`FileSet::sort_by_name`].
    pub fn sort_by_name(&mut self) {
        self.fileset.sort_by_name();
    }

    /// Empty the set on the user's request.
    pub fn clear_all(&mut self) {
        self.fileset.clear();
        self.sink.notify(&Notification::success("All files cleared"));
    }

    /// The current ordered file list.
    pub fn files(&self) -> &[SelectedFile] {
        self.fileset.files()
    }

    /// Current run state of the merger.
    pub fn status(&self) -> MergeStatus {
        self.merger.status()
    }

    /// Merge the current file list into one document.
    ///
    /// On success the file set resets (the merger has already waited out
    /// the display window) and the output is handed to the caller for
    /// delivery. Failures leave the file list untouched so the user can
    /// retry.
    ///
    /// # Errors
    ///
    /// Propagates every error of [`Merger::merge`].
    pub async fn merge(&mut self) -> Result<MergeOutput> {
        let result = self
            .merger
            .merge(self.fileset.files(), self.sink.as_ref())
            .await;

        if result.is_ok() {
            self.fileset.clear();
        }

        result
    }
}
