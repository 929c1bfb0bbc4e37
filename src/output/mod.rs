//! Output module for crawl results
//!
//! This module handles:
//! - Writing the discovered domains to the result file
//! - Echoing results to the console
//! - Printing crawl statistics

pub mod stats;
mod traits;

pub use stats::{format_summary, print_summary};
pub use traits::{CrawlSummary, OutputError, OutputHandler, OutputResult};

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes domains to a file, one per line
///
/// An existing file is overwritten.
pub fn write_domains(path: &Path, domains: &BTreeSet<String>) -> OutputResult<()> {
    let write_error = |source| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    for domain in domains {
        writeln!(writer, "{}", domain).map_err(write_error)?;
    }
    writer.flush().map_err(write_error)?;

    tracing::debug!("Wrote {} domains to {}", domains.len(), path.display());
    Ok(())
}

/// Prints domains to stdout, one per line
pub fn print_domains(domains: &BTreeSet<String>) {
    for domain in domains {
        println!("{}", domain);
    }
}

/// Plain text output: result file plus console echo
#[derive(Debug, Clone)]
pub struct TextOutput {
    path: PathBuf,
    verbose: bool,
    print_stats: bool,
}

impl TextOutput {
    /// Creates a text output handler
    ///
    /// # Arguments
    ///
    /// * `path` - Result file
    /// * `verbose` - Echo every domain to the console
    pub fn new(path: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            path: path.into(),
            verbose,
            print_stats: true,
        }
    }

    /// Disables printing of the statistics block on finalize
    pub fn without_stats(mut self) -> Self {
        self.print_stats = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for TextOutput {
    fn record_domains(&self, domains: &BTreeSet<String>) -> OutputResult<()> {
        println!("\n\nFound Sites: ({})", domains.len());
        write_domains(&self.path, domains)?;

        if self.verbose {
            print_domains(domains);
        }

        Ok(())
    }

    fn finalize(&self, summary: &CrawlSummary) -> OutputResult<()> {
        if self.print_stats {
            println!();
            print_summary(summary);
        }
        Ok(())
    }
}
