//! Archive creation module.
//!
//! This module turns filesystem sources into a zip archive: the walker
//! enumerates entries and the zip writer serializes them.

pub mod config;
pub mod report;
pub mod walker;
pub mod zip;

// Re-exports for public API
pub use config::CreationConfig;
pub use report::CreationReport;
pub use walker::ArchiveEntry;
pub use walker::EntryEnumerator;
