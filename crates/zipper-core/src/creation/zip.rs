//! ZIP archive creation.
//!
//! Writes the entries produced by [`EntryEnumerator`] into a zip container.
//! The destination file only survives a fully successful write: any error
//! removes it before being returned.

use crate::ArchiveError;
use crate::Result;
use crate::creation::config::CreationConfig;
use crate::creation::report::CreationReport;
use crate::creation::walker::ArchiveEntry;
use crate::creation::walker::EntryEnumerator;
use crate::error::zip_error;
use std::ffi::OsString;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// File name extension of archives written by this module.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Size of the chunks file content is streamed in.
const CHUNK_SIZE: usize = 64 * 1024;

/// Entries at or above this size need the zip64 extension.
const LARGE_FILE_THRESHOLD: u64 = 0xFFFF_FFFF;

/// Creates a ZIP archive from `sources` at `output`.
///
/// `output` is normalized with [`normalize_archive_path`] and any existing
/// file there is replaced.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use zipper_core::creation::CreationConfig;
/// use zipper_core::creation::zip::create_zip;
///
/// let config = CreationConfig::default();
/// let report = create_zip(Path::new("backup"), &[Path::new("/home/me/notes")], &config)?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), zipper_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - A source path does not exist (`SourceNotFound`)
/// - A source is the destination archive itself (`SourceIsDestination`);
///   nothing is deleted in that case
/// - The destination is a directory or cannot be created
/// - Reading a source or writing the container fails
///
/// In every other error case no file is left at the destination.
pub fn create_zip<P: AsRef<Path>, Q: AsRef<Path>>(
    output: P,
    sources: &[Q],
    config: &CreationConfig,
) -> Result<CreationReport> {
    config.validate()?;
    let output = normalize_archive_path(output.as_ref())?;
    let start = Instant::now();

    reject_output_as_source(&output, sources)?;
    let entries = match EntryEnumerator::new(sources) {
        Ok(entries) => entries,
        Err(e) => {
            if let Err(cleanup) = remove_existing_archive(&output) {
                log::warn!("failed to remove archive {}: {cleanup}", output.display());
            }
            return Err(e);
        }
    };

    remove_existing_archive(&output)?;

    let pending = PendingArchive::new(&output);
    let file = File::create(&output).map_err(|e| {
        ArchiveError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot create archive {}: {e}", output.display()),
        ))
    })?;

    let mut report = CreationReport::default();
    let writer = write_zip(BufWriter::new(file), &output, entries, config, &mut report)?;
    let file = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;
    file.sync_all()?;
    report.bytes_compressed = file.metadata()?.len();
    drop(file);

    pending.commit();
    report.duration = start.elapsed();

    log::info!(
        "created {} with {} files and {} directories",
        output.display(),
        report.files_added,
        report.directories_added
    );

    Ok(report)
}

/// Appends `.zip` to the file name of `path` unless it already ends with
/// it (compared ASCII case-insensitively).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use zipper_core::creation::zip::normalize_archive_path;
///
/// assert_eq!(normalize_archive_path(Path::new("out"))?, Path::new("out.zip"));
/// assert_eq!(normalize_archive_path(Path::new("out.ZIP"))?, Path::new("out.ZIP"));
/// assert_eq!(normalize_archive_path(Path::new("a.tar"))?, Path::new("a.tar.zip"));
/// # Ok::<(), zipper_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an `InvalidInput` I/O error if `path` has no file name.
pub fn normalize_archive_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        ArchiveError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("archive path has no file name: {}", path.display()),
        ))
    })?;

    if file_name
        .to_string_lossy()
        .to_ascii_lowercase()
        .ends_with(ARCHIVE_EXTENSION)
    {
        return Ok(path.to_path_buf());
    }

    let mut with_extension = OsString::from(file_name);
    with_extension.push(ARCHIVE_EXTENSION);
    Ok(path.with_file_name(with_extension))
}

/// Fails if a top-level source resolves to the existing file at `output`.
///
/// Replacing that file would destroy a requested input before it is read.
fn reject_output_as_source<Q: AsRef<Path>>(output: &Path, sources: &[Q]) -> Result<()> {
    let Ok(archive_path) = output.canonicalize() else {
        return Ok(());
    };
    for source in sources {
        let source = source.as_ref();
        if source
            .canonicalize()
            .is_ok_and(|canonical| canonical == archive_path)
        {
            return Err(ArchiveError::SourceIsDestination {
                path: source.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Removes a previous archive so the new one is never appended or merged.
fn remove_existing_archive(output: &Path) -> Result<()> {
    match output.symlink_metadata() {
        Ok(metadata) if metadata.is_dir() => Err(ArchiveError::Io(std::io::Error::new(
            std::io::ErrorKind::IsADirectory,
            format!("archive destination is a directory: {}", output.display()),
        ))),
        Ok(_) => {
            log::debug!("replacing existing archive {}", output.display());
            std::fs::remove_file(output)?;
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ArchiveError::Io(e)),
    }
}

/// Removes a half-written archive unless the write was committed.
struct PendingArchive<'a> {
    path: &'a Path,
    committed: bool,
}

impl<'a> PendingArchive<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PendingArchive<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => log::debug!("removed incomplete archive {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "failed to remove incomplete archive {}: {e}",
                self.path.display()
            ),
        }
    }
}

/// Streams every enumerated entry into a new container over `writer`.
fn write_zip<W: Write + Seek>(
    writer: W,
    output: &Path,
    entries: EntryEnumerator,
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = entry_options(config);
    let archive_path = output.canonicalize()?;

    // Reusable buffer for file copying
    let mut buffer = vec![0u8; CHUNK_SIZE];

    for entry in entries {
        let mut entry = entry?;

        if entry.is_directory() {
            zip.add_directory(entry.name().as_str(), options)
                .map_err(|e| zip_error("failed to add directory", e))?;
            report.directories_added += 1;
            log::debug!("added directory {}", entry.name());
        } else if is_same_file(entry.source_path(), &archive_path) {
            log::warn!(
                "skipping {}: it is the archive being written",
                entry.source_path().display()
            );
        } else {
            add_file_to_zip(&mut zip, &mut entry, config, options, &mut buffer, report)?;
        }
    }

    zip.finish()
        .map_err(|e| zip_error("failed to finish ZIP archive", e))
}

/// Builds the per-entry options shared by every entry.
fn entry_options(config: &CreationConfig) -> SimpleFileOptions {
    if config.compression_level == Some(0) {
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
    } else {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(config.compression_level.map(i64::from))
    }
}

/// Adds a single file entry, streaming its content in fixed-size chunks.
fn add_file_to_zip<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &mut ArchiveEntry,
    config: &CreationConfig,
    options: SimpleFileOptions,
    buffer: &mut [u8],
    report: &mut CreationReport,
) -> Result<()> {
    let name = entry.name().as_str().to_owned();
    let source = entry.source_path().to_path_buf();
    let file = entry.content_mut().ok_or_else(|| {
        ArchiveError::Io(std::io::Error::other(format!(
            "file entry without content: {name}"
        )))
    })?;
    let metadata = file.metadata()?;

    let base_options = options.large_file(metadata.len() >= LARGE_FILE_THRESHOLD);
    let file_options = if config.preserve_permissions {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            base_options.unix_permissions(metadata.permissions().mode())
        }
        #[cfg(not(unix))]
        {
            base_options
        }
    } else {
        base_options
    };

    zip.start_file(name.as_str(), file_options)
        .map_err(|e| zip_error("failed to start file in ZIP", e))?;

    let mut bytes_written = 0u64;
    loop {
        let bytes_read = file.read(buffer).map_err(|e| {
            ArchiveError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {e}", source.display()),
            ))
        })?;
        if bytes_read == 0 {
            break;
        }
        zip.write_all(&buffer[..bytes_read])?;
        bytes_written += bytes_read as u64;
    }

    report.files_added += 1;
    report.bytes_written += bytes_written;
    log::debug!("added {name} ({bytes_written} bytes)");

    Ok(())
}

/// Returns `true` if `source` resolves to the archive being written.
///
/// Only sources sharing the archive's file name are canonicalized.
fn is_same_file(source: &Path, archive_path: &Path) -> bool {
    source.file_name() == archive_path.file_name()
        && source
            .canonicalize()
            .is_ok_and(|canonical| canonical == archive_path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    fn entry_names(archive: &Path) -> Vec<String> {
        let file = File::open(archive).unwrap();
        let zip = zip::ZipArchive::new(file).unwrap();
        zip.file_names().map(str::to_owned).collect()
    }

    #[test]
    fn test_create_zip_single_file() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("txt.txt");
        fs::write(&source, "121212").unwrap();
        let output = temp.path().join("out.zip");

        let report = create_zip(&output, &[&source], &CreationConfig::default()).unwrap();
        assert_eq!(report.files_added, 1);
        assert_eq!(report.directories_added, 0);
        assert_eq!(report.bytes_written, 6);
        assert!(report.bytes_compressed > 0);

        let mut zip = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut entry = zip.by_name("txt.txt").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "121212");
    }

    #[test]
    fn test_create_zip_appends_extension() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();

        create_zip(temp.path().join("out"), &[&source], &CreationConfig::default()).unwrap();
        assert!(temp.path().join("out.zip").exists());
        assert!(!temp.path().join("out").exists());
    }

    #[test]
    fn test_create_zip_empty_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir1");
        fs::create_dir(&dir).unwrap();
        let output = temp.path().join("out.zip");

        let report = create_zip(&output, &[&dir], &CreationConfig::default()).unwrap();
        assert_eq!(report.directories_added, 1);
        assert_eq!(entry_names(&output), vec!["dir1/"]);
    }

    #[test]
    fn test_create_zip_stored() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("data.bin");
        fs::write(&source, vec![7u8; 4096]).unwrap();
        let output = temp.path().join("out.zip");

        let config = CreationConfig::default().with_compression_level(Some(0));
        create_zip(&output, &[&source], &config).unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let entry = zip.by_index(0).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
        assert_eq!(entry.size(), 4096);
    }

    #[test]
    fn test_create_zip_missing_source_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("present.txt");
        fs::write(&present, "x").unwrap();
        let missing = temp.path().join("missing.txt");
        let output = temp.path().join("out.zip");

        let result = create_zip(&output, &[&present, &missing], &CreationConfig::default());
        assert!(matches!(result, Err(ArchiveError::SourceNotFound { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_create_zip_failure_removes_previous_archive() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.zip");
        fs::write(&output, "old archive").unwrap();

        let result = create_zip(
            &output,
            &[temp.path().join("missing")],
            &CreationConfig::default(),
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_create_zip_duplicate_names_fail_cleanly() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a")).unwrap();
        fs::create_dir_all(temp.path().join("b")).unwrap();
        fs::write(temp.path().join("a/same.txt"), "1").unwrap();
        fs::write(temp.path().join("b/same.txt"), "2").unwrap();
        let output = temp.path().join("out.zip");

        let result = create_zip(
            &output,
            &[temp.path().join("a/same.txt"), temp.path().join("b/same.txt")],
            &CreationConfig::default(),
        );
        assert!(matches!(result, Err(ArchiveError::Io(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_create_zip_refuses_destination_as_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();
        let bundle = temp.path().join("bundle.zip");
        fs::write(&bundle, "previous bundle").unwrap();

        let result = create_zip(
            temp.path().join("bundle"),
            &[&bundle, &source],
            &CreationConfig::default(),
        );
        match result {
            Err(ArchiveError::SourceIsDestination { path }) => assert_eq!(path, bundle),
            other => panic!("expected SourceIsDestination, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&bundle).unwrap(), "previous bundle");
    }

    #[test]
    fn test_create_zip_refuses_destination_through_other_spelling() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        let bundle = dir.join("bundle.zip");
        fs::write(&bundle, "previous bundle").unwrap();

        let result = create_zip(
            &bundle,
            &[dir.join(".").join("bundle.zip")],
            &CreationConfig::default(),
        );
        assert!(matches!(
            result,
            Err(ArchiveError::SourceIsDestination { .. })
        ));
        assert_eq!(fs::read_to_string(&bundle).unwrap(), "previous bundle");
    }

    #[test]
    fn test_create_zip_rejects_directory_destination() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();
        let output = temp.path().join("taken.zip");
        fs::create_dir(&output).unwrap();

        let result = create_zip(&output, &[&source], &CreationConfig::default());
        assert!(matches!(result, Err(ArchiveError::Io(_))));
        assert!(output.is_dir());
    }

    #[test]
    fn test_create_zip_rejects_invalid_level() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();
        let output = temp.path().join("out.zip");

        let config = CreationConfig::default().with_compression_level(Some(12));
        assert!(create_zip(&output, &[&source], &config).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_create_zip_skips_itself() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("keep.txt"), "keep").unwrap();
        let output = dir.join("self.zip");

        let report = create_zip(&output, &[&dir], &CreationConfig::default()).unwrap();
        assert_eq!(report.files_added, 1);

        let mut names = entry_names(&output);
        names.sort();
        assert_eq!(names, vec!["dir/", "dir/keep.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_create_zip_records_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("run.sh");
        fs::write(&source, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o755)).unwrap();
        let output = temp.path().join("out.zip");

        create_zip(&output, &[&source], &CreationConfig::default()).unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let entry = zip.by_index(0).unwrap();
        assert_eq!(entry.unix_mode().unwrap() & 0o777, 0o755);
    }

    #[test]
    fn test_normalize_archive_path() {
        assert_eq!(
            normalize_archive_path(Path::new("/tmp/out")).unwrap(),
            Path::new("/tmp/out.zip")
        );
        assert_eq!(
            normalize_archive_path(Path::new("/tmp/out.zip")).unwrap(),
            Path::new("/tmp/out.zip")
        );
        assert_eq!(
            normalize_archive_path(Path::new("/tmp/Out.Zip")).unwrap(),
            Path::new("/tmp/Out.Zip")
        );
        assert!(normalize_archive_path(Path::new("/")).is_err());
    }
}
