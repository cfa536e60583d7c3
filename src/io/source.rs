//! Sources of candidate document bytes.
//!
//! The core accepts opaque file handles: anything that can report its
//! display name, size, MIME type and last-modified stamp, and read its
//! full contents on demand. Selection dialogs, drag-drop payloads and
//! test fixtures all reduce to this trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};

/// An opaque handle to a user-chosen file.
///
/// Metadata is available synchronously; contents are read lazily and may
/// suspend.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Display name (also the sort key).
    fn name(&self) -> &str;

    /// Size in bytes.
    fn size(&self) -> u64;

    /// Reported MIME type.
    fn content_type(&self) -> &str;

    /// Last-modified timestamp.
    fn last_modified(&self) -> DateTime<Utc>;

    /// Read the complete contents.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the source has become
    /// unreadable since selection.
    async fn read_all_bytes(&self) -> io::Result<Vec<u8>>;
}

/// A file on the local filesystem.
///
/// Metadata is captured at open time; contents are read when the merge
/// pipeline asks for them.
#[derive(Debug, Clone)]
pub struct DiskSource {
    path: PathBuf,
    name: String,
    size: u64,
    content_type: String,
    last_modified: DateTime<Utc>,
}

impl DiskSource {
    /// Open a file and capture its metadata.
    ///
    /// The MIME type is inferred from the extension; only `.pdf` maps to
    /// `application/pdf`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's metadata cannot be read.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;

        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {}", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Self {
            content_type: content_type_for(&path),
            size: metadata.len(),
            name,
            last_modified,
            path,
        })
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for DiskSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    async fn read_all_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// A file held entirely in memory.
///
/// The natural carrier for drag-drop payloads handed over by a front end,
/// and for test fixtures.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    content_type: String,
    last_modified: DateTime<Utc>,
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Create a source claiming the `application/pdf` type.
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, "application/pdf", bytes)
    }

    /// Create a source with an explicit MIME type.
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            last_modified: Utc::now(),
            bytes,
        }
    }

    /// Override the last-modified stamp.
    pub fn with_last_modified(mut self, stamp: DateTime<Utc>) -> Self {
        self.last_modified = stamp;
        self
    }
}

#[async_trait]
impl FileSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    async fn read_all_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// MIME type inferred from a path's extension.
fn content_type_for(path: &Path) -> String {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        "application/pdf".to_string()
    } else {
        "application/octet-stream".to_string()
    }
}
