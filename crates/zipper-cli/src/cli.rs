//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "zipper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Operation to run; without one an interactive menu is started
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Archive files and directories into a zip file
    Archive(ArchiveArgs),
    /// Extract a zip file
    Extract(ExtractArgs),
}

#[derive(clap::Args)]
pub struct ArchiveArgs {
    /// Output archive path (".zip" is appended when missing)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to archive
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Compression level (0 stores entries uncompressed)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the zip file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: the directory containing the archive)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Preserve file permissions from archive
    #[arg(long)]
    pub preserve_permissions: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["zipper"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_archive_args() {
        let cli = Cli::try_parse_from(["zipper", "archive", "out", "a", "b", "-l", "0"]).unwrap();
        let Some(Commands::Archive(args)) = cli.command else {
            panic!("expected archive subcommand");
        };
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.sources, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(args.compression_level, Some(0));
    }

    #[test]
    fn test_archive_requires_source() {
        assert!(Cli::try_parse_from(["zipper", "archive", "out"]).is_err());
    }

    #[test]
    fn test_compression_level_range() {
        assert!(Cli::try_parse_from(["zipper", "archive", "out", "a", "-l", "10"]).is_err());
    }

    #[test]
    fn test_extract_args() {
        let cli = Cli::try_parse_from(["zipper", "-q", "extract", "in.zip", "--preserve-permissions"])
            .unwrap();
        assert!(cli.quiet);
        let Some(Commands::Extract(args)) = cli.command else {
            panic!("expected extract subcommand");
        };
        assert_eq!(args.archive, PathBuf::from("in.zip"));
        assert!(args.output_dir.is_none());
        assert!(args.preserve_permissions);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["zipper", "-v", "-q"]).is_err());
    }
}
