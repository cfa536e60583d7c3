//! File acquisition.

pub mod source;

pub use source::{DiskSource, FileSource, MemorySource};
