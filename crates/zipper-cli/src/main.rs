//! Zipper CLI - Command-line utility for archiving files into zip archives
//! and extracting them.

mod cli;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use simplelog::ColorChoice;
use simplelog::ConfigBuilder;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.verbose, cli.quiet);

    match &cli.command {
        Some(cli::Commands::Archive(args)) => commands::archive::execute(args, &*formatter),
        Some(cli::Commands::Extract(args)) => commands::extract::execute(args, &*formatter),
        None => commands::menu::execute(cli.verbose, cli.quiet),
    }
}

/// Routes library log records to stderr so they never mix with results.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("failed to initialize logging: {e}");
    }
}
