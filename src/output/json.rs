//! JSON output format

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::compare::{Bar, Comparison, Histogram};
use crate::config::DEFAULT_BINS;

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
    bins: usize,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self {
            pretty: true,
            bins: DEFAULT_BINS,
        }
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::new()
        }
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    old_file: String,
    new_file: String,
    #[serde(flatten)]
    comparison: &'a Comparison,
    histogram: Histogram,
    bars: Vec<Bar>,
}

impl OutputFormatter for JsonOutput {
    fn render(
        &self,
        comparison: &Comparison,
        old_path: &Path,
        new_path: &Path,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let report = JsonReport {
            old_file: old_path.display().to_string(),
            new_file: new_path.display().to_string(),
            comparison,
            histogram: comparison.histogram(self.bins),
            bars: comparison.bars(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &report)?;
        } else {
            serde_json::to_writer(&mut *writer, &report)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
