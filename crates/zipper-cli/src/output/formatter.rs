//! Output formatter trait for CLI results.

use anyhow::Result;
use std::path::Path;
use zipper_core::CreationReport;
use zipper_core::ExtractionReport;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of writing `archive`
    fn format_creation_result(&self, archive: &Path, report: &CreationReport) -> Result<()>;

    /// Format the result of extracting into `destination`
    fn format_extraction_result(&self, destination: &Path, report: &ExtractionReport)
    -> Result<()>;
}
