//! Validated safe path type for archive extraction.

use crate::ArchiveError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;
use super::EntryName;

/// A relative path, derived from an archive entry name, that is safe to
/// materialize under a destination directory.
///
/// `SafePath` represents a path that has been validated to not contain:
/// - Parent directory traversal (`..`)
/// - Absolute prefixes (`/`, drive letters, UNC shares)
/// - Null bytes
///
/// and whose existing ancestors, once symlinks are resolved, stay inside
/// the destination directory.
///
/// There is no `From<PathBuf>` implementation: validation is the only way
/// to construct one.
///
/// # Examples
///
/// ```no_run
/// use zipper_core::types::DestDir;
/// use zipper_core::types::EntryName;
/// use zipper_core::types::SafePath;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::prepare("/tmp/restored")?;
///
/// let safe = SafePath::validate(&EntryName::parse("dir1/dir2/txt2.txt"), &dest)?;
/// assert!(dest.join(&safe).starts_with(dest.as_path()));
///
/// assert!(SafePath::validate(&EntryName::parse("../etc/passwd"), &dest).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Validates an entry name against a destination directory.
    ///
    /// # Validation Steps
    ///
    /// 1. Reject null bytes and names starting with a separator
    /// 2. Normalize each segment, skipping `.` and empty segments
    /// 3. Reject `..`, root and prefix components
    /// 4. Reject names with no segments left
    /// 5. Canonicalize the nearest existing ancestor of the target and
    ///    require it to stay inside the destination
    ///
    /// The target itself is not canonicalized: an existing symlink at the
    /// target is replaced during extraction, never followed.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::PathTraversal` if any step fails, or an I/O
    /// error if an existing ancestor cannot be canonicalized.
    pub fn validate(name: &EntryName, dest: &DestDir) -> Result<Self> {
        let raw = name.as_str();
        let traversal = || ArchiveError::PathTraversal {
            name: raw.to_string(),
        };

        if raw.contains('\0') || raw.starts_with('/') {
            return Err(traversal());
        }

        let mut normalized = PathBuf::new();
        for segment in name.segments() {
            for component in Path::new(segment).components() {
                match component {
                    Component::Normal(part) => normalized.push(part),
                    Component::CurDir => {}
                    Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                        return Err(traversal());
                    }
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(traversal());
        }

        let resolved = dest.as_path().join(&normalized);
        if let Some(parent) = resolved.parent() {
            let anchor = nearest_existing_ancestor(parent);
            let canonical = anchor.canonicalize().map_err(|e| {
                ArchiveError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to canonicalize {}: {e}", anchor.display()),
                ))
            })?;
            if !canonical.starts_with(dest.as_path()) {
                return Err(traversal());
            }
        }

        Ok(Self(normalized))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// Walks up from `path` until an existing filesystem object is found.
///
/// Dangling symlinks count as existing so that they are canonicalized (and
/// fail) instead of being skipped over.
fn nearest_existing_ancestor(path: &Path) -> &Path {
    let mut current = path;
    loop {
        if current.symlink_metadata().is_ok() {
            return current;
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dest() -> (TempDir, DestDir) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::prepare(temp.path()).expect("failed to create dest");
        (temp, dest)
    }

    fn validate(raw: &str, dest: &DestDir) -> Result<SafePath> {
        SafePath::validate(&EntryName::parse(raw), dest)
    }

    #[test]
    fn test_valid_relative_file() {
        let (_temp, dest) = create_test_dest();
        let safe = validate("foo/bar/baz.txt", &dest).expect("should be valid");
        assert_eq!(safe.as_path(), Path::new("foo/bar/baz.txt"));
    }

    #[test]
    fn test_directory_marker_strips_trailing_separator() {
        let (_temp, dest) = create_test_dest();
        let safe = validate("dir1/dir2/", &dest).expect("should be valid");
        assert_eq!(safe.as_path(), Path::new("dir1/dir2"));
    }

    #[test]
    fn test_current_dir_segments_normalized() {
        let (_temp, dest) = create_test_dest();
        let safe = validate("./foo/./bar.txt", &dest).expect("should be valid");
        assert_eq!(safe.as_path(), Path::new("foo/bar.txt"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp, dest) = create_test_dest();
        for raw in ["", "/", "./", "."] {
            assert!(
                matches!(validate(raw, &dest), Err(ArchiveError::PathTraversal { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parent_traversal_rejected() {
        let (_temp, dest) = create_test_dest();
        for raw in [
            "../etc/passwd",
            "../../etc/passwd",
            "foo/../../etc/passwd",
            "foo/../bar.txt",
            "..\\windows\\system32",
        ] {
            assert!(
                matches!(validate(raw, &dest), Err(ArchiveError::PathTraversal { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_absolute_rejected() {
        let (_temp, dest) = create_test_dest();
        let result = validate("/etc/passwd", &dest);
        assert!(matches!(result, Err(ArchiveError::PathTraversal { .. })));
    }

    #[test]
    fn test_null_byte_rejected() {
        let (_temp, dest) = create_test_dest();
        let result = validate("foo\0bar.txt", &dest);
        assert!(matches!(result, Err(ArchiveError::PathTraversal { .. })));
    }

    #[test]
    fn test_existing_parent_accepted() {
        let (temp, dest) = create_test_dest();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        let safe = validate("a/b/c.txt", &dest).expect("should be valid");
        assert!(dest.join(&safe).starts_with(dest.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_parent_escape_rejected() {
        use std::os::unix::fs::symlink;

        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        symlink(outside.path(), temp.path().join("escape")).unwrap();

        let result = validate("escape/evil.txt", &dest);
        assert!(matches!(result, Err(ArchiveError::PathTraversal { .. })));

        let result = validate("escape/deeper/evil.txt", &dest);
        assert!(matches!(result, Err(ArchiveError::PathTraversal { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_parent_inside_accepted() {
        use std::os::unix::fs::symlink;

        let (temp, dest) = create_test_dest();
        fs::create_dir(temp.path().join("real")).unwrap();
        symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();

        assert!(validate("alias/file.txt", &dest).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_target_itself_not_followed() {
        use std::os::unix::fs::symlink;

        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        symlink(outside.path(), temp.path().join("link")).unwrap();

        // The link is the target, not an ancestor; extraction replaces it.
        let safe = validate("link", &dest).expect("target link is replaced, not followed");
        assert_eq!(safe.as_path(), Path::new("link"));
    }

    #[test]
    fn test_nearest_existing_ancestor() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("x/y/z");
        assert_eq!(nearest_existing_ancestor(&missing), temp.path());
    }
}
