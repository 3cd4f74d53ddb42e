//! High-level public API for archiving and extraction.

use std::path::Path;

use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;

/// Archives `sources` into a zip file at `destination`.
///
/// Each source contributes its base name as the top-level entry; directories
/// are included recursively. `.zip` is appended to `destination` when
/// missing, and a file already there is replaced.
///
/// # Errors
///
/// Returns `ArchiveError::SourceNotFound` if a source does not exist and
/// `ArchiveError::Io` for any read or write failure. No archive is left at
/// the destination after an error.
///
/// # Examples
///
/// ```no_run
/// use zipper_core::archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = archive(&["/home/me/notes", "/home/me/todo.txt"], "/tmp/backup")?;
/// println!("Archived {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn archive<P: AsRef<Path>, Q: AsRef<Path>>(
    sources: &[P],
    destination: Q,
) -> Result<CreationReport> {
    archive_with_config(sources, destination, &CreationConfig::default())
}

/// Archives `sources` into `destination` using an explicit configuration.
///
/// # Errors
///
/// Same as [`archive`], plus `ArchiveError::InvalidCompressionLevel` for
/// an out-of-range compression level.
pub fn archive_with_config<P: AsRef<Path>, Q: AsRef<Path>>(
    sources: &[P],
    destination: Q,
    config: &CreationConfig,
) -> Result<CreationReport> {
    crate::creation::zip::create_zip(destination, sources, config)
}

/// Extracts the zip archive at `archive_path` into `destination`.
///
/// The destination directory is created if needed. Existing files or
/// directories at entry paths are replaced.
///
/// # Errors
///
/// Returns an error if:
/// - The archive does not exist or is not a zip (`ArchiveNotFound`)
/// - The destination exists and is not a directory (`InvalidDestination`)
/// - An entry escapes the destination (`PathTraversal`)
/// - I/O operations fail
///
/// # Examples
///
/// ```no_run
/// use zipper_core::extract;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = extract("/tmp/backup.zip", "/tmp/restored")?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    destination: Q,
) -> Result<ExtractionReport> {
    extract_with_config(archive_path, destination, &ExtractionConfig::default())
}

/// Extracts `archive_path` into `destination` using an explicit
/// configuration.
///
/// # Errors
///
/// Same as [`extract`].
pub fn extract_with_config<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    destination: Q,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    crate::extraction::zip::extract_zip(archive_path, destination, config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArchiveError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_archive_then_extract() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("notes");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "alpha").unwrap();

        let report = archive(&[&source], temp.path().join("backup")).unwrap();
        assert_eq!(report.total_entries(), 2);

        let restored = temp.path().join("restored");
        let report = extract(temp.path().join("backup.zip"), &restored).unwrap();
        assert_eq!(report.total_items(), 2);
        assert_eq!(
            fs::read_to_string(restored.join("notes/a.txt")).unwrap(),
            "alpha"
        );
    }

    #[test]
    fn test_archive_with_invalid_config() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();

        let config = CreationConfig::default().with_compression_level(Some(42));
        let result = archive_with_config(&[&source], temp.path().join("out.zip"), &config);
        assert!(matches!(
            result,
            Err(ArchiveError::InvalidCompressionLevel { level: 42 })
        ));
    }
}
