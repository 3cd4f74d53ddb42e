//! Interactive menu driven by numbered commands on standard input.

use crate::commands::extract::default_output_dir;
use crate::error::convert_archive_error;
use crate::output::format_size;
use anyhow::Context;
use anyhow::Result;
use console::style;
use std::env;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;
use zipper_core::archive;
use zipper_core::creation::zip::normalize_archive_path;
use zipper_core::extract;

/// Runs the menu on the process's stdin and stdout.
pub fn execute(verbose: bool, quiet: bool) -> Result<()> {
    let base_dir = env::current_dir().context("failed to get current directory")?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(stdin.lock(), stdout.lock(), base_dir)
        .with_verbosity(verbose, quiet)
        .run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Archive,
    Extract,
    Exit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().parse::<i64>() {
            Ok(1) => Some(Self::Archive),
            Ok(2) => Some(Self::Extract),
            Ok(0) => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Prompt loop over an input and an output stream.
///
/// Names typed by the user are resolved against `base_dir`. Operation
/// failures are reported and the loop continues; only failures of the
/// streams themselves end it with an error.
///
/// Quiet mode drops success summaries but keeps prompts and errors;
/// verbose mode adds sizes and timings.
pub struct Menu<R, W> {
    input: R,
    output: W,
    base_dir: PathBuf,
    verbose: bool,
    quiet: bool,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub const fn new(input: R, output: W, base_dir: PathBuf) -> Self {
        Self {
            input,
            output,
            base_dir,
            verbose: false,
            quiet: false,
        }
    }

    pub const fn with_verbosity(mut self, verbose: bool, quiet: bool) -> Self {
        self.verbose = verbose;
        self.quiet = quiet;
        self
    }

    /// Loops until `0` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_commands()?;

            let Some(line) = self.read_line()? else {
                return Ok(());
            };

            match Command::parse(&line) {
                Some(Command::Archive) => self.archive()?,
                Some(Command::Extract) => self.extract()?,
                Some(Command::Exit) => return Ok(()),
                None => writeln!(self.output, "Unknown command")?,
            }
        }
    }

    fn print_commands(&mut self) -> io::Result<()> {
        writeln!(self.output, "Enter 1 to archive files")?;
        writeln!(self.output, "Enter 2 to extract an archive")?;
        writeln!(self.output, "Enter 0 to exit")?;
        self.output.flush()
    }

    fn archive(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Enter file and directory names separated by whitespace:"
        )?;
        let Some(line) = self.read_line()? else {
            return Ok(());
        };
        let sources: Vec<PathBuf> = line
            .split_whitespace()
            .map(|name| self.base_dir.join(name))
            .collect();
        if sources.is_empty() {
            writeln!(self.output, "Nothing to archive")?;
            return Ok(());
        }

        writeln!(self.output, "Enter archive name (.zip is added if missing):")?;
        let Some(line) = self.read_line()? else {
            return Ok(());
        };
        let name = line.trim();
        if name.is_empty() {
            writeln!(self.output, "No archive name given")?;
            return Ok(());
        }
        let target = self.base_dir.join(name);

        let result = normalize_archive_path(&target)
            .and_then(|path| archive(&sources, &path).map(|report| (path, report)));
        match result {
            Ok((path, report)) => {
                log::debug!("menu archive finished: {}", path.display());
                if !self.quiet {
                    writeln!(
                        self.output,
                        "{} Archived {} entries into {}",
                        style("✓").green(),
                        report.total_entries(),
                        path.display()
                    )?;
                }
                if self.verbose {
                    writeln!(
                        self.output,
                        "  {} read, {} written in {:?}",
                        format_size(report.bytes_written),
                        format_size(report.bytes_compressed),
                        report.duration
                    )?;
                }
            }
            Err(e) => self.report_failure(convert_archive_error(e, &target))?,
        }
        Ok(())
    }

    fn extract(&mut self) -> Result<()> {
        writeln!(self.output, "Enter archive name:")?;
        let Some(line) = self.read_line()? else {
            return Ok(());
        };
        let name = line.trim();
        if name.is_empty() {
            writeln!(self.output, "No archive name given")?;
            return Ok(());
        }
        let archive_path = self.base_dir.join(name);
        let destination = default_output_dir(&archive_path)?;

        match extract(&archive_path, &destination) {
            Ok(report) => {
                if !self.quiet {
                    writeln!(
                        self.output,
                        "{} Extracted {} entries into {}",
                        style("✓").green(),
                        report.total_items(),
                        destination.display()
                    )?;
                }
                if self.verbose {
                    writeln!(
                        self.output,
                        "  {} written in {:?}",
                        format_size(report.bytes_written),
                        report.duration
                    )?;
                }
            }
            Err(e) => self.report_failure(convert_archive_error(e, &archive_path))?,
        }
        Ok(())
    }

    fn report_failure(&mut self, err: anyhow::Error) -> io::Result<()> {
        writeln!(self.output, "{} {err}", style("Error:").red().bold())
    }

    /// Reads one line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
