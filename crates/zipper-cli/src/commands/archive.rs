//! Archive command implementation.

use crate::cli::ArchiveArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use zipper_core::CreationConfig;
use zipper_core::archive_with_config;
use zipper_core::creation::zip::normalize_archive_path;

pub fn execute(args: &ArchiveArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut config = CreationConfig::default();
    if let Some(level) = args.compression_level {
        config = config.with_compression_level(Some(level));
    }

    let archive_path = add_archive_context(normalize_archive_path(&args.output), &args.output)?;

    let report = add_archive_context(
        archive_with_config(&args.sources, &archive_path, &config),
        &archive_path,
    )?;

    formatter.format_creation_result(&archive_path, &report)?;

    Ok(())
}
