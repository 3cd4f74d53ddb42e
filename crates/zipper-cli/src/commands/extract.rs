//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use std::env;
use std::path::Path;
use std::path::PathBuf;
use zipper_core::ExtractionConfig;
use zipper_core::extract_with_config;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => default_output_dir(&args.archive)?,
    };

    let config = ExtractionConfig::default().with_preserve_permissions(args.preserve_permissions);

    let report = add_archive_context(
        extract_with_config(&args.archive, &output_dir, &config),
        &args.archive,
    )?;

    formatter.format_extraction_result(&output_dir, &report)?;

    Ok(())
}

/// Returns the directory containing `archive`, or the current directory
/// for a bare file name.
pub fn default_output_dir(archive: &Path) -> Result<PathBuf> {
    match archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => env::current_dir().context("failed to get current directory"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir_uses_parent() {
        let dir = default_output_dir(Path::new("/data/archives/in.zip")).unwrap();
        assert_eq!(dir, PathBuf::from("/data/archives"));
    }

    #[test]
    fn test_default_output_dir_bare_name() {
        let dir = default_output_dir(Path::new("in.zip")).unwrap();
        assert_eq!(dir, env::current_dir().unwrap());
    }
}
