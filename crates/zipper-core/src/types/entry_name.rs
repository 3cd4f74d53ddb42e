//! Canonical in-archive entry names.

use std::fmt;
use std::path::Component;
use std::path::Path;

use crate::ArchiveError;
use crate::Result;

/// Separator used between name segments inside an archive.
pub const SEPARATOR: char = '/';

/// The name of an entry as stored in a zip container.
///
/// Segments are joined with `/` and directory entries carry a trailing
/// `/`. Names produced by the enumerator are always relative; names parsed
/// from a container are untrusted until validated into a
/// [`SafePath`](super::SafePath).
///
/// # Examples
///
/// ```
/// use zipper_core::types::EntryName;
///
/// let dir = EntryName::parse("docs/");
/// assert!(dir.is_directory());
///
/// let file = EntryName::parse("docs\\readme.txt");
/// assert_eq!(file.as_str(), "docs/readme.txt");
/// assert!(!file.is_directory());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName(String);

impl EntryName {
    /// Builds the name for a filesystem object found under a source.
    ///
    /// `base_name` is the last segment of the top-level source and
    /// `relative` is the object's path relative to that source (empty for
    /// the source itself).
    ///
    /// # Errors
    ///
    /// Returns an `InvalidData` I/O error if a segment is not valid UTF-8,
    /// and `InvalidInput` if `relative` is not a plain relative path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use zipper_core::types::EntryName;
    ///
    /// let root = EntryName::for_source("dir1", Path::new(""), true)?;
    /// assert_eq!(root.as_str(), "dir1/");
    ///
    /// let nested = EntryName::for_source("dir1", Path::new("dir2/txt2.txt"), false)?;
    /// assert_eq!(nested.as_str(), "dir1/dir2/txt2.txt");
    /// # Ok::<(), zipper_core::ArchiveError>(())
    /// ```
    pub fn for_source(base_name: &str, relative: &Path, is_directory: bool) -> Result<Self> {
        let mut name = String::from(base_name);

        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or_else(|| {
                        ArchiveError::Io(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            format!("file name is not valid UTF-8: {}", relative.display()),
                        ))
                    })?;
                    name.push(SEPARATOR);
                    name.push_str(segment);
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ArchiveError::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("not a relative path: {}", relative.display()),
                    )));
                }
            }
        }

        if is_directory {
            name.push(SEPARATOR);
        }

        Ok(Self(name))
    }

    /// Wraps a raw name read from a container.
    ///
    /// Backslashes written by some Windows tools are treated as separators.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.replace('\\', "/"))
    }

    /// Returns the name as stored in the archive.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name denotes a directory marker.
    #[inline]
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.0.ends_with(SEPARATOR)
    }

    /// Iterates over the non-empty segments of the name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|segment| !segment.is_empty())
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
