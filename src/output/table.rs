//! Console table output

use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::walker::{DirectorySizeResult, format_number};

use super::config::OutputConfig;

const FILES_WIDTH: usize = 12;
const SIZE_WIDTH: usize = 18;
const HUMAN_WIDTH: usize = 8;

/// Writes one row per sized directory under a bold header.
pub struct TableFormatter {
    config: OutputConfig,
}

impl TableFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn write_header<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        if self.config.use_color {
            out.set_color(ColorSpec::new().set_bold(true))?;
        }
        write!(out, "{:>FILES_WIDTH$} {:>SIZE_WIDTH$}", "Files", "Size")?;
        if self.config.human_sizes {
            write!(out, " {:>HUMAN_WIDTH$}", "")?;
        }
        writeln!(out, "  Directory")?;
        out.reset()?;
        Ok(())
    }

    pub fn write_row<W: WriteColor>(
        &self,
        out: &mut W,
        result: &DirectorySizeResult,
    ) -> io::Result<()> {
        write!(
            out,
            "{:>FILES_WIDTH$} {:>SIZE_WIDTH$}",
            format_number(result.file_count()),
            format_number(result.total_size())
        )?;
        if self.config.human_sizes {
            if self.config.use_color {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            }
            write!(out, " {:>HUMAN_WIDTH$}", result.human_size())?;
            out.reset()?;
        }
        write!(out, "  ")?;
        if self.config.use_color {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        }
        write!(out, "{}", result.directory().display())?;
        out.reset()?;
        writeln!(out)
    }

    /// Header followed by one row per result. Nothing is written for an
    /// empty slice.
    pub fn write_table<W: WriteColor>(
        &self,
        out: &mut W,
        results: &[DirectorySizeResult],
    ) -> io::Result<()> {
        if results.is_empty() {
            return Ok(());
        }
        self.write_header(out)?;
        for result in results {
            self.write_row(out, result)?;
        }
        Ok(())
    }
}

/// Print results as a table to stdout.
pub fn print_table(results: &[DirectorySizeResult], config: OutputConfig) -> io::Result<()> {
    let choice = if config.use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    TableFormatter::new(config).write_table(&mut stdout, results)
}
