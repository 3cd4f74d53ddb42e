//! Configuration for archive creation operations.

use crate::ArchiveError;
use crate::Result;

/// Highest deflate level accepted by [`CreationConfig::validate`].
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

/// Configuration for archive creation operations.
///
/// # Examples
///
/// ```
/// use zipper_core::creation::CreationConfig;
///
/// let config = CreationConfig::default();
/// assert_eq!(config.compression_level, Some(6));
///
/// let stored = CreationConfig::default().with_compression_level(Some(0));
/// assert!(stored.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationConfig {
    /// Deflate compression level (0-9).
    ///
    /// `Some(0)` stores entries without compression. `None` uses the
    /// deflate default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Record Unix permission bits of archived files.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(6),
            preserve_permissions: true,
        }
    }
}

impl CreationConfig {
    /// Creates a new `CreationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets whether to record permission bits.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::InvalidCompressionLevel` if the compression
    /// level is above 9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > MAX_COMPRESSION_LEVEL
        {
            return Err(ArchiveError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}
