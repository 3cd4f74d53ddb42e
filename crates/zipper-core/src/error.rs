//! Error types for archive creation and extraction.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while archiving or extracting.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// A source nominated for archiving does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// The archive to extract is missing or is not a zip container.
    #[error("archive not found: {path} ({reason})")]
    ArchiveNotFound {
        /// The archive path that was requested.
        path: PathBuf,
        /// Why the path was not accepted as an archive.
        reason: String,
    },

    /// The extraction target exists but is not a directory.
    #[error("invalid destination, not a directory: {path}")]
    InvalidDestination {
        /// The rejected destination path.
        path: PathBuf,
    },

    /// An archive entry would be written outside the destination directory.
    #[error("path traversal detected: {name}")]
    PathTraversal {
        /// The entry name as stored in the archive.
        name: String,
    },

    /// A source nominated for archiving is the archive file being written.
    #[error("source is the archive destination: {path}")]
    SourceIsDestination {
        /// The source path that resolves to the destination.
        path: PathBuf,
    },

    /// The requested compression level is outside `0..=9`.
    #[error("invalid compression level {level}, expected 0-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Returns `true` if this error was raised to protect the filesystem
    /// from a hostile archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipper_core::ArchiveError;
    ///
    /// let err = ArchiveError::PathTraversal {
    ///     name: "../etc/passwd".to_string(),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ArchiveError::InvalidDestination {
    ///     path: "out.txt".into(),
    /// };
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }

    /// Returns the filesystem path this error refers to, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use zipper_core::ArchiveError;
    ///
    /// let err = ArchiveError::SourceNotFound {
    ///     path: "/data/missing".into(),
    /// };
    /// assert_eq!(err.path(), Some(Path::new("/data/missing")));
    /// ```
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SourceNotFound { path }
            | Self::ArchiveNotFound { path, .. }
            | Self::SourceIsDestination { path }
            | Self::InvalidDestination { path } => Some(path),
            Self::PathTraversal { .. } | Self::InvalidCompressionLevel { .. } | Self::Io(_) => {
                None
            }
        }
    }
}

/// Converts a container-level error from the `zip` crate into an
/// `ArchiveError::Io`, keeping the underlying I/O error when there is one.
pub(crate) fn zip_error(action: &str, err: zip::result::ZipError) -> ArchiveError {
    match err {
        zip::result::ZipError::Io(io_err) => ArchiveError::Io(std::io::Error::new(
            io_err.kind(),
            format!("{action}: {io_err}"),
        )),
        other => ArchiveError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{action}: {other}"),
        )),
    }
}
