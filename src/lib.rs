//! pdfdeck - Arrange, reorder and merge PDF files into a single document.
//!
//! This library implements the engine behind a "pick files, put them in
//! order, merge, download" front end. It owns the ordered file list, the
//! acceptance rules, and the merge pipeline; it emits typed events for a
//! presentation layer to render. It does not render anything itself and
//! it does not deliver the output; those belong to the embedder.
//!
//! - Ordered, deduplicated file list with reorder, sort and clear
//! - Sequential merge pipeline with fractional progress reporting
//! - Pluggable document backend (lopdf bundled)
//! - Event subscription instead of callbacks into rendering code
//!
//! # Examples
//!
//! ## Full flow
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pdfdeck::config::Settings;
//! use pdfdeck::events::NullSink;
//! use pdfdeck::io::{DiskSource, FileSource};
//! use pdfdeck::session::MergeSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::new(Settings::default(), Arc::new(NullSink));
//!
//! let a = DiskSource::open("a.pdf").await?;
//! let b = DiskSource::open("b.pdf").await?;
//! session.add_files(vec![
//!     Arc::new(a) as Arc<dyn FileSource>,
//!     Arc::new(b) as Arc<dyn FileSource>,
//! ]);
//!
//! let output = session.merge().await?;
//! std::fs::write(&output.suggested_filename, &output.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Subscribing to events
//!
//! ```
//! use pdfdeck::events::{EventSink, MemorySink, Notification};
//!
//! let sink = MemorySink::new();
//! sink.notify(&Notification::success("2 PDF file(s) added"));
//! assert_eq!(sink.notifications().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod events;
pub mod fileset;
pub mod io;
pub mod merge;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use error::{PdfDeckError, Result};
pub use session::MergeSession;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
