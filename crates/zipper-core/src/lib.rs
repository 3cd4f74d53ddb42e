//! Zip archive creation and extraction engine.
//!
//! `zipper-core` archives files and directory trees into a standard zip
//! container and extracts zip containers back onto the filesystem. Archive
//! writes are all-or-nothing: a failed write never leaves a partial archive
//! behind. Extraction validates every entry path against the destination
//! directory before touching the filesystem.
//!
//! # Examples
//!
//! ```no_run
//! use zipper_core::archive;
//! use zipper_core::extract;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = archive(&["/data/a/dir1"], "/tmp/out.zip")?;
//! println!("Archived {} files", report.files_added);
//!
//! let report = extract("/tmp/out.zip", "/tmp/restored")?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod creation;
pub mod error;
pub mod extraction;
pub mod report;
pub mod types;

// Re-export main API types
pub use api::archive;
pub use api::archive_with_config;
pub use api::extract;
pub use api::extract_with_config;
pub use config::ExtractionConfig;
pub use creation::CreationConfig;
pub use creation::CreationReport;
pub use error::ArchiveError;
pub use error::Result;
pub use report::ExtractionReport;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryName;
pub use types::SafePath;
