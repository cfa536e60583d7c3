//! Error types for pdfdeck.
//!
//! This module defines all error types that can occur while managing the
//! file list or running a merge. Errors carry enough context for
//! diagnostics while staying presentable: precondition violations map to
//! transient warnings, pipeline failures map to a single generic
//! user-facing message with the detail reserved for logs.

use std::io;

use crate::events::Severity;

/// Result type alias for pdfdeck operations.
pub type Result<T> = std::result::Result<T, PdfDeckError>;

/// Generic user-facing message for any failure inside the merge pipeline.
///
/// The underlying cause is logged; users only see this.
pub const MERGE_FAILED_MESSAGE: &str =
    "Could not merge the selected documents. Please try again.";

/// Main error type for pdfdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfDeckError {
    /// An index was outside the bounds of the current file list.
    ///
    /// This indicates a presentation-layer bug; correct front ends guard
    /// their indices before calling in.
    #[error("index {index} is out of range for a list of {len} file(s)")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the list at the time of the call.
        len: usize,
    },

    /// A merge was requested with fewer than two documents.
    #[error("at least 2 documents are required to merge, got {count}")]
    InsufficientFiles {
        /// Number of documents that were available.
        count: usize,
    },

    /// A merge was requested while another one is still running.
    #[error("a merge is already in progress")]
    AlreadyRunning,

    /// Reading a selected file's bytes failed.
    #[error("failed to read {name}")]
    SourceRead {
        /// Display name of the file that could not be read.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The document backend could not parse a selected file.
    #[error("failed to load document {name}: {reason}")]
    FailedToLoadDocument {
        /// Display name of the unparseable file.
        name: String,
        /// Reason reported by the backend.
        reason: String,
    },

    /// Copying or appending pages into the output document failed.
    #[error("merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Serializing the accumulated output document failed.
    #[error("failed to serialize output document: {reason}")]
    SerializeFailed {
        /// Reason reported by the backend.
        reason: String,
    },

    /// Invalid settings.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the settings.
        message: String,
    },
}

impl PdfDeckError {
    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a SourceRead error.
    pub fn source_read(name: impl Into<String>, source: io::Error) -> Self {
        Self::SourceRead {
            name: name.into(),
            source,
        }
    }

    /// Create a FailedToLoadDocument error.
    pub fn failed_to_load(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadDocument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create a SerializeFailed error.
    pub fn serialize_failed(reason: impl Into<String>) -> Self {
        Self::SerializeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if this error is a precondition violation.
    ///
    /// Precondition violations reject the request without touching any
    /// state; they are reported as warnings, not failures.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFiles { .. } | Self::AlreadyRunning
        )
    }

    /// Check if this error aborted a merge pipeline.
    pub fn is_pipeline_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceRead { .. }
                | Self::FailedToLoadDocument { .. }
                | Self::MergeFailed { .. }
                | Self::SerializeFailed { .. }
        )
    }

    /// Notification severity for surfacing this error to the user.
    pub fn severity(&self) -> Severity {
        if self.is_precondition() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    /// The message a notification should carry for this error.
    ///
    /// Pipeline failures collapse to a generic message; the detailed
    /// error is logged instead.
    pub fn user_message(&self) -> String {
        if self.is_pipeline_failure() {
            MERGE_FAILED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}
