//! The merge run itself.
//!
//! [`Merger`] takes the ordered file list, feeds every document through
//! the backend in order, and reports progress at each phase boundary.
//! Exactly one run may be active at a time; requests arriving while one
//! is active are rejected, never queued. A failed run aborts with no
//! partial output and leaves the merger ready for the next attempt.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{PdfDeckError, Result};
use crate::events::{EventSink, Notification, ProgressUpdate};
use crate::fileset::SelectedFile;
use crate::merge::backend::{DocumentBackend, LopdfBackend};
use crate::utils::format_file_size;

// Progress weighting: the ingestion loop owns the first half of the
// range, finalization and output preparation the fixed marks after it.
const INGEST_SHARE: f32 = 50.0;
const FINALIZE_PERCENT: f32 = 75.0;
const PREPARE_PERCENT: f32 = 90.0;
const COMPLETE_PERCENT: f32 = 100.0;

/// Run state of the merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStatus {
    /// No run is active.
    Idle,
    /// A run is in progress.
    Running,
    /// A run finished and is in its display window before resetting.
    Succeeded,
    /// A run failed. Transient; the status resets to Idle immediately.
    Failed,
}

/// Statistics about a completed merge.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of documents merged.
    pub files_merged: usize,

    /// Total number of pages in the output document.
    pub total_pages: usize,

    /// Combined size of the input files in bytes.
    pub input_size: u64,

    /// Wall time of the run.
    pub merge_time: Duration,

    /// Whether the output was serialized with optimization.
    pub optimized: bool,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// Result of a successful merge.
#[derive(Debug)]
pub struct MergeOutput {
    /// The serialized output document.
    pub bytes: Vec<u8>,

    /// Suggested filename, embedding the current date.
    pub suggested_filename: String,

    /// Statistics about the run.
    pub statistics: MergeStatistics,
}

/// Drives merge runs against a document backend.
pub struct Merger<B: DocumentBackend> {
    backend: B,
    settings: Settings,
    status: Mutex<MergeStatus>,
}

impl Merger<LopdfBackend> {
    /// Create a merger backed by lopdf.
    pub fn new(settings: Settings) -> Self {
        Self::with_backend(LopdfBackend::new(), settings)
    }
}

impl<B: DocumentBackend> Merger<B> {
    /// Create a merger with a custom backend.
    pub fn with_backend(backend: B, settings: Settings) -> Self {
        Self {
            backend,
            settings,
            status: Mutex::new(MergeStatus::Idle),
        }
    }

    /// Current run state.
    pub fn status(&self) -> MergeStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge the given files, in order, into one document.
    ///
    /// Progress and notifications stream into `sink` at every phase
    /// boundary. On success the run stays in its display window for
    /// [`Settings::reset_delay`] before this returns, so the caller can
    /// reset the file list the moment it gets the output.
    ///
    /// # Errors
    ///
    /// - [`PdfDeckError::InsufficientFiles`] with fewer than two files;
    ///   no state changes.
    /// - [`PdfDeckError::AlreadyRunning`] while another run is active;
    ///   no second pipeline is started.
    /// - Any pipeline failure aborts the run with no partial output; the
    ///   detail is logged and a generic error notification is emitted.
    pub async fn merge(
        &self,
        files: &[SelectedFile],
        sink: &dyn EventSink,
    ) -> Result<MergeOutput> {
        if files.len() < 2 {
            let err = PdfDeckError::InsufficientFiles { count: files.len() };
            sink.notify(&Notification::warning(
                "Select at least 2 PDF files to merge",
            ));
            return Err(err);
        }

        let guard = match self.begin() {
            Ok(guard) => guard,
            Err(err) => {
                sink.notify(&Notification::warning(err.user_message()));
                return Err(err);
            }
        };

        match self.run_pipeline(files, sink).await {
            Ok(output) => {
                guard.set(MergeStatus::Succeeded);
                sink.notify(&Notification::success("PDFs merged successfully"));
                tokio::time::sleep(self.settings.reset_delay).await;
                Ok(output)
            }
            Err(err) => {
                guard.set(MergeStatus::Failed);
                tracing::error!(error = %err, "merge pipeline failed");
                sink.notify(&Notification::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Claim the run slot, rejecting the request if one is active.
    fn begin(&self) -> Result<StatusGuard<'_>> {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);

        if *status != MergeStatus::Idle {
            return Err(PdfDeckError::AlreadyRunning);
        }

        *status = MergeStatus::Running;
        Ok(StatusGuard {
            status: &self.status,
        })
    }

    async fn run_pipeline(
        &self,
        files: &[SelectedFile],
        sink: &dyn EventSink,
    ) -> Result<MergeOutput> {
        let started = Instant::now();
        let total = files.len();

        let mut output_doc = self.backend.create_empty();
        let mut total_pages = 0usize;
        let mut processed = 0usize;

        // Reads may overlap up to the configured width; `buffered` yields
        // in input order, which keeps the append order deterministic.
        async fn read_one(file: &SelectedFile) -> Result<(&SelectedFile, Vec<u8>)> {
            let bytes = file.read_bytes().await?;
            Ok((file, bytes))
        }
        let mut contents =
            stream::iter(files.iter().map(read_one)).buffered(self.settings.read_ahead.max(1));

        while let Some(read) = contents.next().await {
            let (file, bytes) = read?;

            sink.progress(&ProgressUpdate::new(
                processed as f32 / total as f32 * INGEST_SHARE,
                format!("Processing {}...", file.name),
            ));

            let source_doc = self.backend.load(&file.name, &bytes)?;
            let indices = self.backend.page_indices(&source_doc);
            let pages = self
                .backend
                .copy_pages(&mut output_doc, &source_doc, &indices)?;
            for page in pages {
                self.backend.append_page(&mut output_doc, page)?;
            }

            total_pages += indices.len();
            processed += 1;

            tracing::debug!(
                file = %file.name,
                pages = indices.len(),
                "copied document into output"
            );

            sink.progress(&ProgressUpdate::new(
                processed as f32 / total as f32 * INGEST_SHARE,
                format!("Processing {}...", file.name),
            ));
        }

        sink.progress(&ProgressUpdate::new(
            FINALIZE_PERCENT,
            "Finalizing merged document...",
        ));

        let bytes = self
            .backend
            .serialize(&mut output_doc, self.settings.optimize_output)?;

        sink.progress(&ProgressUpdate::new(PREPARE_PERCENT, "Preparing output..."));

        let suggested_filename = format!("Merged_PDF_{}.pdf", Utc::now().format("%Y-%m-%d"));

        sink.progress(&ProgressUpdate::new(COMPLETE_PERCENT, "Merge completed"));

        Ok(MergeOutput {
            bytes,
            suggested_filename,
            statistics: MergeStatistics {
                files_merged: total,
                total_pages,
                input_size: files.iter().map(|f| f.size).sum(),
                merge_time: started.elapsed(),
                optimized: self.settings.optimize_output,
            },
        })
    }
}

/// Resets the status to Idle on every exit path.
struct StatusGuard<'a> {
    status: &'a Mutex<MergeStatus>,
}

impl StatusGuard<'_> {
    fn set(&self, status: MergeStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

impl Drop for StatusGuard<'_> {
    fn drop(&mut self) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = MergeStatus::Idle;
    }
}
