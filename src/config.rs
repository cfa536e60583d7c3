//! Settings for pdfdeck.
//!
//! This module holds the acceptance limits applied to incoming files and
//! the tuning knobs for the merge pipeline. Embedders override individual
//! fields of the defaults and call [`Settings::validate`] once at
//! construction time.

use anyhow::{Result, bail};
use std::time::Duration;

/// Largest file accepted into the set, in bytes (50 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// MIME type accepted into the set.
pub const DEFAULT_ACCEPTED_TYPE: &str = "application/pdf";

/// Complete settings for a merge session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Maximum size of a single accepted file, in bytes.
    pub max_file_size: u64,

    /// MIME type a candidate must report to be accepted.
    pub accepted_type: String,

    /// Number of file reads allowed in flight during a merge.
    ///
    /// `1` keeps ingestion strictly sequential. Larger values overlap
    /// reads; append order into the output document is unaffected.
    pub read_ahead: usize,

    /// Serialize the output with object-stream optimization.
    pub optimize_output: bool,

    /// How long a finished merge stays on screen before the file set
    /// resets.
    pub reset_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            accepted_type: DEFAULT_ACCEPTED_TYPE.to_string(),
            read_ahead: 1,
            optimize_output: true,
            reset_delay: Duration::from_secs(1),
        }
    }
}

impl Settings {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The maximum file size is zero
    /// - The accepted MIME type is empty
    /// - The read-ahead width is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size == 0 {
            bail!("Maximum file size must be at least 1 byte");
        }

        if self.accepted_type.trim().is_empty() {
            bail!("Accepted MIME type cannot be empty");
        }

        if self.read_ahead == 0 {
            bail!("Read-ahead width must be at least 1");
        }

        Ok(())
    }

    /// Check whether a candidate's type and size pass the acceptance
    /// filter.
    pub fn accepts(&self, content_type: &str, size: u64) -> bool {
        content_type == self.accepted_type && size <= self.max_file_size
    }
}
