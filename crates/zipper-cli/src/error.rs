//! Error conversion utilities for CLI.
//!
//! Converts zipper-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use zipper_core::ArchiveError;

/// Converts `ArchiveError` to user-friendly anyhow error with context.
///
/// `target` is the archive being written or read.
pub fn convert_archive_error(err: ArchiveError, target: &Path) -> anyhow::Error {
    match err {
        ArchiveError::SourceNotFound { path } => {
            anyhow!(
                "Cannot archive into '{}': source '{}' does not exist\n\
                 HINT: Check the spelling; relative names are resolved against the current directory.",
                target.display(),
                path.display()
            )
        }
        ArchiveError::ArchiveNotFound { path, reason } => {
            anyhow!(
                "Cannot open archive '{}': {}\n\
                 HINT: Only zip archives can be extracted.",
                path.display(),
                reason
            )
        }
        ArchiveError::InvalidDestination { path } => {
            anyhow!(
                "Cannot extract '{}': destination '{}' exists and is not a directory",
                target.display(),
                path.display()
            )
        }
        ArchiveError::PathTraversal { name } => {
            anyhow!(
                "Security violation: Archive '{}' attempted path traversal with '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                target.display(),
                name
            )
        }
        ArchiveError::SourceIsDestination { path } => {
            anyhow!(
                "Cannot archive into '{}': source '{}' is the archive being written\n\
                 HINT: Choose a different archive name or remove it from the sources.",
                target.display(),
                path.display()
            )
        }
        ArchiveError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level} for '{}'\n\
                 HINT: Use a level from 0 (stored) to 9 (smallest).",
                target.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!("I/O error while processing '{}': {}", target.display(), io_err)
        }
    }
}

/// Adds context to a library result about archive operations.
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    target: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, target))
}
