//! Source enumeration for archive creation.
//!
//! Turns an ordered list of source paths into a lazy stream of
//! [`ArchiveEntry`] values. Directories are walked with `walkdir`, whose
//! iterator keeps its own stack of open directories, so tree depth never
//! turns into call-stack depth.

use crate::ArchiveError;
use crate::Result;
use crate::types::EntryName;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// One entry ready to be written to an archive.
///
/// File entries own an open handle to their content; the handle is closed
/// when the entry is dropped.
#[derive(Debug)]
pub struct ArchiveEntry {
    name: EntryName,
    source: PathBuf,
    content: Option<File>,
}

impl ArchiveEntry {
    /// Returns the in-archive name.
    #[must_use]
    pub fn name(&self) -> &EntryName {
        &self.name
    }

    /// Returns `true` for directory markers.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.name.is_directory()
    }

    /// Returns the filesystem path the entry was read from.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// Returns the open content stream of a file entry.
    pub fn content_mut(&mut self) -> Option<&mut File> {
        self.content.as_mut()
    }
}

/// Lazy, single-pass enumerator over the entries of a set of sources.
///
/// Each top-level source is named by its base name. A directory yields its
/// own marker first, then every descendant in filesystem-listing order,
/// with each directory's marker preceding anything nested under it.
/// Symbolic links are followed; special files are skipped.
///
/// # Examples
///
/// ```no_run
/// use zipper_core::creation::walker::EntryEnumerator;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// for entry in EntryEnumerator::new(&["/home/me/notes"])? {
///     let entry = entry?;
///     println!("{}", entry.name());
/// }
/// # Ok(())
/// # }
/// ```
pub struct EntryEnumerator {
    pending: std::vec::IntoIter<SourceRoot>,
    current: Option<SourceWalk>,
}

struct SourceRoot {
    path: PathBuf,
    base_name: String,
}

struct SourceWalk {
    root: PathBuf,
    base_name: String,
    walker: walkdir::IntoIter,
}

impl EntryEnumerator {
    /// Prepares enumeration of `sources`.
    ///
    /// Every source is checked before anything is produced, so a missing
    /// source fails the whole enumeration up front.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::SourceNotFound` for the first source that
    /// does not exist, or an I/O error if a source has no usable base name.
    pub fn new<P: AsRef<Path>>(sources: &[P]) -> Result<Self> {
        let mut roots = Vec::with_capacity(sources.len());

        for source in sources {
            let path = source.as_ref();
            if !path.exists() {
                return Err(ArchiveError::SourceNotFound {
                    path: path.to_path_buf(),
                });
            }
            roots.push(SourceRoot {
                base_name: base_name(path)?,
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            pending: roots.into_iter(),
            current: None,
        })
    }
}

impl Iterator for EntryEnumerator {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(walk) = self.current.as_mut() else {
                let root = self.pending.next()?;
                self.current = Some(SourceWalk::new(root));
                continue;
            };

            let Some(next) = walk.walker.next() else {
                self.current = None;
                continue;
            };

            match next {
                Ok(dir_entry) => match walk.build_entry(&dir_entry) {
                    Ok(Some(entry)) => return Some(Ok(entry)),
                    Ok(None) => {}
                    Err(e) => return Some(Err(e)),
                },
                Err(e) => return Some(Err(ArchiveError::Io(std::io::Error::from(e)))),
            }
        }
    }
}

impl SourceWalk {
    fn new(root: SourceRoot) -> Self {
        let walker = WalkDir::new(&root.path).follow_links(true).into_iter();
        Self {
            root: root.path,
            base_name: root.base_name,
            walker,
        }
    }

    /// Builds an `ArchiveEntry` from a `walkdir::DirEntry`.
    ///
    /// Returns `Ok(None)` for objects that are neither files nor
    /// directories.
    fn build_entry(&self, dir_entry: &walkdir::DirEntry) -> Result<Option<ArchiveEntry>> {
        let path = dir_entry.path();
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            ArchiveError::Io(std::io::Error::other(format!(
                "path {} is not under source {}",
                path.display(),
                self.root.display()
            )))
        })?;

        let file_type = dir_entry.file_type();
        let (name, content) = if file_type.is_dir() {
            (EntryName::for_source(&self.base_name, relative, true)?, None)
        } else if file_type.is_file() {
            let file = File::open(path).map_err(|e| {
                ArchiveError::Io(std::io::Error::new(
                    e.kind(),
                    format!("cannot open {}: {e}", path.display()),
                ))
            })?;
            (
                EntryName::for_source(&self.base_name, relative, false)?,
                Some(file),
            )
        } else {
            log::warn!("skipping special file {}", path.display());
            return Ok(None);
        };

        Ok(Some(ArchiveEntry {
            name,
            source: path.to_path_buf(),
            content,
        }))
    }
}

/// Returns the last segment of a source path, canonicalizing paths that
/// end in `.` or `..` first.
fn base_name(path: &Path) -> Result<String> {
    let canonical;
    let name = match path.file_name() {
        Some(name) => name,
        None => {
            canonical = path.canonicalize()?;
            canonical.file_name().ok_or_else(|| {
                ArchiveError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("cannot determine a name for {}", path.display()),
                ))
            })?
        }
    };

    name.to_str().map(str::to_owned).ok_or_else(|| {
        ArchiveError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("file name is not valid UTF-8: {}", path.display()),
        ))
    })
}
