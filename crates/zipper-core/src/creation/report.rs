//! Archive creation operation reporting.

use std::time::Duration;

/// Report of an archive creation operation.
///
/// # Examples
///
/// ```
/// use zipper_core::creation::CreationReport;
///
/// let mut report = CreationReport::default();
/// report.files_added = 10;
/// report.bytes_written = 1024;
/// report.bytes_compressed = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Number of file entries written.
    pub files_added: usize,

    /// Number of directory marker entries written.
    pub directories_added: usize,

    /// Total uncompressed bytes of file content written.
    pub bytes_written: u64,

    /// Size of the finished archive file in bytes.
    pub bytes_compressed: u64,

    /// Duration of the creation operation.
    pub duration: Duration,
}

impl CreationReport {
    /// Creates a new empty creation report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the archive.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added
    }

    /// Returns the ratio of uncompressed content to archive size.
    ///
    /// Returns `0.0` when the archive size is unknown (zero).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }
}
