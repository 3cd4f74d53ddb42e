//! Configuration for archive extraction.

/// Options controlling how entries are materialized on disk.
///
/// # Examples
///
/// ```
/// use zipper_core::ExtractionConfig;
///
/// let config = ExtractionConfig::default();
/// assert!(!config.preserve_permissions);
///
/// let config = ExtractionConfig::default().with_preserve_permissions(true);
/// assert!(config.preserve_permissions);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Apply Unix permission bits recorded in the archive (masked to
    /// `0o777`) to extracted files.
    ///
    /// Default: `false`.
    pub preserve_permissions: bool,
}

impl ExtractionConfig {
    /// Creates a new `ExtractionConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to apply recorded permission bits.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }
}
