//! The ordered set of selected candidate documents.
//!
//! [`FileSet`] owns everything between "the user picked some files" and
//! "the merge pipeline wants an ordered list": acceptance filtering,
//! duplicate suppression, reordering, sorting and clearing. Order is
//! user-significant (it determines the page order of the merged output),
//! so every mutator preserves or deliberately permutes it and then pushes
//! a fresh [`FileListState`] to the event sink.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::error::{PdfDeckError, Result};
use crate::events::{EventSink, FileListState, FileSummary, Notification};
use crate::io::FileSource;
use crate::utils::{compare_display_names, format_file_size};

/// One user-chosen candidate document.
#[derive(Clone)]
pub struct SelectedFile {
    /// Display name; also the sort key.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last-modified timestamp.
    pub last_modified: DateTime<Utc>,
    source: Arc<dyn FileSource>,
}

impl SelectedFile {
    /// Capture a source's metadata into a list entry.
    pub fn from_source(source: Arc<dyn FileSource>) -> Self {
        Self {
            name: source.name().to_string(),
            size: source.size(),
            last_modified: source.last_modified(),
            source,
        }
    }

    /// Read the file's complete contents.
    ///
    /// # Errors
    ///
    /// Returns a [`PdfDeckError::SourceRead`] naming this file if the
    /// underlying source fails.
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        self.source
            .read_all_bytes()
            .await
            .map_err(|e| PdfDeckError::source_read(self.name.clone(), e))
    }

    /// Whether this entry matches the given identity pair.
    fn matches(&self, name: &str, size: u64) -> bool {
        self.name == name && self.size == size
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("last_modified", &self.last_modified)
            .finish_non_exhaustive()
    }
}

/// Counts from one [`FileSet::add`] call.
///
/// The three counts partition the candidates that were offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddResult {
    /// Candidates appended to the set.
    pub added: usize,
    /// Candidates dropped for wrong type or oversize.
    pub rejected: usize,
    /// Candidates dropped as (name, size) duplicates.
    pub duplicates: usize,
}

/// Ordered, deduplicated collection of selected files.
pub struct FileSet {
    files: Vec<SelectedFile>,
    settings: Settings,
    sink: Arc<dyn EventSink>,
}

impl FileSet {
    /// Create an empty set.
    pub fn new(settings: Settings, sink: Arc<dyn EventSink>) -> Self {
        Self {
            files: Vec::new(),
            settings,
            sink,
        }
    }

    /// Offer candidates to the set.
    ///
    /// Candidates must report the accepted MIME type and fit the size
    /// limit; survivors matching an existing entry's (name, size) pair
    /// are dropped as duplicates. The rest append in input order.
    ///
    /// Emits a state-changed event when anything was appended, a success
    /// notification for the appended count, and a warning when nothing
    /// survived, with distinct messages for "nothing valid" and "all
    /// duplicates".
    pub fn add(&mut self, sources: Vec<Arc<dyn FileSource>>) -> AddResult {
        let mut result = AddResult::default();

        for source in sources {
            if !self
                .settings
                .accepts(source.content_type(), source.size())
            {
                result.rejected += 1;
                continue;
            }

            let candidate = SelectedFile::from_source(source);
            if self
                .files
                .iter()
                .any(|f| f.matches(&candidate.name, candidate.size))
            {
                result.duplicates += 1;
                continue;
            }

            self.files.push(candidate);
            result.added += 1;
        }

        tracing::debug!(
            added = result.added,
            rejected = result.rejected,
            duplicates = result.duplicates,
            "processed file selection"
        );

        if result.added > 0 {
            self.emit_state();
            self.sink.notify(&Notification::success(format!(
                "{} PDF file(s) added",
                result.added
            )));
        } else if result.duplicates > 0 {
            self.sink.notify(&Notification::warning(
                "Those PDF file(s) are already in the list",
            ));
        } else {
            self.sink.notify(&Notification::warning(format!(
                "Select valid PDF files (max {} each)",
                format_file_size(self.settings.max_file_size)
            )));
        }

        result
    }

    /// Remove the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::IndexOutOfRange`] if `index` is outside
    /// the current bounds.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.files.len() {
            return Err(PdfDeckError::index_out_of_range(index, self.files.len()));
        }

        self.files.remove(index);
        self.emit_state();
        self.sink.notify(&Notification::success("File removed"));

        Ok(())
    }

    /// Move the entry at `from` so it ends up at position `to`.
    ///
    /// The entry is removed first and reinserted at `to` in the
    /// shortened sequence. `from == to` is a successful no-op that still
    /// notifies.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::IndexOutOfRange`] if either index is
    /// outside the current bounds.
    pub fn move_file(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.files.len();
        if from >= len {
            return Err(PdfDeckError::index_out_of_range(from, len));
        }
        if to >= len {
            return Err(PdfDeckError::index_out_of_range(to, len));
        }

        if from != to {
            let moved = self.files.remove(from);
            self.files.insert(to, moved);
        }

        self.emit_state();
        self.sink.notify(&Notification::success("File reordered"));

        Ok(())
    }

    /// Move the entry at `index` one position toward the front.
    ///
    /// Already being first is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::IndexOutOfRange`] if `index` is outside
    /// the current bounds.
    pub fn move_up(&mut self, index: usize) -> Result<()> {
        if index >= self.files.len() {
            return Err(PdfDeckError::index_out_of_range(index, self.files.len()));
        }
        if index == 0 {
            return Ok(());
        }
        self.move_file(index, index - 1)
    }

    /// Move the entry at `index` one position toward the back.
    ///
    /// Already being last is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::IndexOutOfRange`] if `index` is outside
    /// the current bounds.
    pub fn move_down(&mut self, index: usize) -> Result<()> {
        if index >= self.files.len() {
            return Err(PdfDeckError::index_out_of_range(index, self.files.len()));
        }
        if index == self.files.len() - 1 {
            return Ok(());
        }
        self.move_file(index, index + 1)
    }

    /// Sort the set ascending by display name.
    ///
    /// The sort is stable; applying it twice yields the same order as
    /// once. Succeeds on empty and single-element sets.
    pub fn sort_by_name(&mut self) {
        self.files
            .sort_by(|a, b| compare_display_names(&a.name, &b.name));
        self.emit_state();
        self.sink
            .notify(&Notification::success("Files sorted alphabetically"));
    }

    /// Empty the set unconditionally.
    ///
    /// Emits a state-changed event; callers decide whether the occasion
    /// deserves a notification.
    pub fn clear(&mut self) {
        self.files.clear();
        self.emit_state();
    }

    /// Read-only view of the set, in merge order.
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Snapshot of the set for the presentation layer.
    pub fn list_state(&self) -> FileListState {
        FileListState {
            count: self.files.len(),
            files: self
                .files
                .iter()
                .enumerate()
                .map(|(position, f)| FileSummary {
                    position,
                    name: f.name.clone(),
                    size: f.size,
                    last_modified: f.last_modified,
                })
                .collect(),
        }
    }

    fn emit_state(&self) {
        self.sink.state_changed(&self.list_state());
    }
}
