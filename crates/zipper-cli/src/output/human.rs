//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use zipper_core::CreationReport;
use zipper_core::ExtractionReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn headline(&self, message: &str) -> String {
        if self.use_colors {
            format!("{} {message}", style("✓").green().bold())
        } else {
            message.to_string()
        }
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.term
                .write_line(line)
                .context("failed to write to stdout")?;
        }
        Ok(())
    }
}

/// Renders a byte count with a binary unit suffix.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_creation_result(&self, archive: &Path, report: &CreationReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut lines = vec![
            self.headline(&format!("Archive created: {}", archive.display())),
            format!("  Files added:      {}", report.files_added),
            format!("  Directories:      {}", report.directories_added),
            format!("  Total size:       {}", format_size(report.bytes_written)),
        ];

        if report.bytes_compressed > 0 {
            lines.push(format!(
                "  Archive size:     {}",
                format_size(report.bytes_compressed)
            ));
        }

        if self.verbose {
            lines.push(format!("  Ratio:            {:.2}", report.compression_ratio()));
            lines.push(format!("  Duration:         {:?}", report.duration));
        }

        self.write_lines(&lines)
    }

    fn format_extraction_result(
        &self,
        destination: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut lines = vec![
            self.headline(&format!("Extracted into: {}", destination.display())),
            format!("  Files extracted:  {}", report.files_extracted),
            format!("  Directories:      {}", report.directories_created),
            format!("  Total size:       {}", format_size(report.bytes_written)),
        ];

        if self.verbose {
            lines.push(format!("  Duration:         {:?}", report.duration));
        }

        self.write_lines(&lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_headline_without_colors() {
        let formatter = HumanFormatter {
            verbose: false,
            quiet: false,
            use_colors: false,
            term: Term::stdout(),
        };
        assert_eq!(formatter.headline("done"), "done");
    }

    #[test]
    fn test_quiet_prints_nothing() {
        let formatter = HumanFormatter::new(false, true);
        let report = CreationReport::new();
        assert!(
            formatter
                .format_creation_result(Path::new("out.zip"), &report)
                .is_ok()
        );
    }
}
