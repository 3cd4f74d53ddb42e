//! Validated destination directory type.

use crate::ArchiveError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

use super::SafePath;

/// A validated destination directory for archive extraction.
///
/// Once constructed, a `DestDir` names an existing directory by its
/// absolute canonical path. All entry paths are validated against this
/// canonical form, so symlinks in the destination path itself are resolved
/// once up front.
///
/// # Examples
///
/// ```no_run
/// use zipper_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::prepare("/tmp/restored")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Validates `path` as an extraction target, creating it if needed.
    ///
    /// A missing directory is created together with its intermediate
    /// directories. An existing directory (or a symlink to one) is accepted
    /// as is.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::InvalidDestination` if the path exists and is
    /// not a directory, or an I/O error if it cannot be created or
    /// canonicalized.
    pub fn prepare(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(ArchiveError::InvalidDestination {
                    path: path.to_path_buf(),
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // A dangling symlink also reports NotFound; refuse to create
                // a directory through it.
                if path.symlink_metadata().is_ok() {
                    return Err(ArchiveError::InvalidDestination {
                        path: path.to_path_buf(),
                    });
                }
                std::fs::create_dir_all(path).map_err(|e| {
                    ArchiveError::Io(std::io::Error::new(
                        e.kind(),
                        format!(
                            "failed to create destination {}: {e}",
                            path.display()
                        ),
                    ))
                })?;
                log::debug!("created destination directory {}", path.display());
            }
            Err(e) => return Err(ArchiveError::Io(e)),
        }

        let canonical = path.canonicalize().map_err(|e| {
            ArchiveError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {e}", path.display()),
            ))
        })?;

        Ok(Self(canonical))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a `SafePath` to this destination directory.
    #[inline]
    #[must_use]
    pub fn join(&self, safe_path: &SafePath) -> PathBuf {
        self.0.join(safe_path.as_path())
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
