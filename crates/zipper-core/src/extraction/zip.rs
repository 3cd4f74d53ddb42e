//! ZIP archive extraction.
//!
//! Entries are replayed in container order. Every entry name is validated
//! into a [`SafePath`] before the filesystem is touched. Extraction is
//! best-effort: an error stops it immediately and entries already written
//! stay on disk.

use crate::ArchiveError;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::error::zip_error;
use crate::types::DestDir;
use crate::types::EntryName;
use crate::types::SafePath;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use zip::ZipArchive;

/// Size of the chunks entry content is streamed in.
const CHUNK_SIZE: usize = 64 * 1024;

/// Extracts the ZIP archive at `archive_path` into `output_dir`.
///
/// The archive is validated by parsing its central directory before the
/// destination is created.
///
/// # Examples
///
/// ```no_run
/// use zipper_core::ExtractionConfig;
/// use zipper_core::extraction::zip::extract_zip;
///
/// let report = extract_zip("backup.zip", "/tmp/restored", &ExtractionConfig::default())?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok::<(), zipper_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The archive is missing or not a zip container (`ArchiveNotFound`)
/// - The destination exists and is not a directory (`InvalidDestination`)
/// - An entry would land outside the destination (`PathTraversal`)
/// - Any I/O operation fails
///
/// Entries that would replace the archive itself, or a directory holding
/// it, are skipped with a warning.
pub fn extract_zip<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    let archive_path = archive_path.as_ref();
    let start = Instant::now();

    let mut archive = open_archive(archive_path)?;
    let archive_file = archive_path.canonicalize()?;
    let dest = DestDir::prepare(output_dir)?;

    let mut report = ExtractionReport::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| zip_error("failed to read entry", e))?;
        let name = EntryName::parse(entry.name());
        let safe_path = SafePath::validate(&name, &dest)?;
        let target = dest.join(&safe_path);

        if archive_file.starts_with(&target) {
            log::warn!("skipping {name}: it would replace the archive being extracted");
            continue;
        }

        if name.is_directory() {
            materialize_directory(&target)?;
            report.directories_created += 1;
            log::debug!("created directory {}", target.display());
        } else {
            let written = materialize_file(&mut entry, &target, &mut buffer)?;
            if config.preserve_permissions
                && let Some(mode) = entry.unix_mode()
            {
                apply_permissions(&target, mode)?;
            }
            report.files_extracted += 1;
            report.bytes_written += written;
            log::debug!("extracted {} ({written} bytes)", target.display());
        }
    }

    report.duration = start.elapsed();
    log::info!(
        "extracted {} into {} ({} files, {} directories)",
        archive_path.display(),
        dest.as_path().display(),
        report.files_extracted,
        report.directories_created
    );

    Ok(report)
}

/// Opens `path` and parses its zip central directory.
///
/// The file type is decided by the container structure, never by the file
/// name or filesystem metadata beyond "is a regular file".
fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let not_found = |reason: String| ArchiveError::ArchiveNotFound {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(not_found("file does not exist".to_string()));
        }
        Err(e) => return Err(ArchiveError::Io(e)),
    };
    if !metadata.is_file() {
        return Err(not_found("not a regular file".to_string()));
    }

    let file = File::open(path)?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| not_found(format!("not a zip archive: {e}")))
}

/// Replaces whatever exists at `target` with an empty directory.
fn materialize_directory(target: &Path) -> Result<()> {
    remove_existing(target)?;
    std::fs::create_dir_all(target).map_err(|e| {
        ArchiveError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to create directory {}: {e}", target.display()),
        ))
    })?;
    Ok(())
}

/// Replaces whatever exists at `target` with a new file holding the
/// content of `entry`. Returns the number of bytes written.
fn materialize_file<R: Read>(entry: &mut R, target: &Path, buffer: &mut [u8]) -> Result<u64> {
    remove_existing(target)?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .map_err(|e| {
            ArchiveError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to create {}: {e}", target.display()),
            ))
        })?;

    let mut bytes_written = 0u64;
    loop {
        let bytes_read = entry.read(buffer)?;
        if bytes_read == 0 {
            break;
        }
        output.write_all(&buffer[..bytes_read])?;
        bytes_written += bytes_read as u64;
    }
    output.flush()?;

    Ok(bytes_written)
}

/// Deletes the filesystem object at `path`, if any.
///
/// Directories are removed recursively; symlinks are removed themselves,
/// never followed.
fn remove_existing(path: &Path) -> Result<()> {
    match path.symlink_metadata() {
        Ok(metadata) if metadata.is_dir() => {
            log::debug!("replacing existing directory {}", path.display());
            std::fs::remove_dir_all(path)?;
        }
        Ok(_) => {
            log::debug!("replacing existing file {}", path.display());
            std::fs::remove_file(path)?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(ArchiveError::Io(e)),
    }
    Ok(())
}

#[cfg(unix)]
fn apply_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o777))?;
    Ok(())
}

#[cfg(not(unix))]
fn apply_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
