//! Output formatting for comparison results

mod html;
mod json;
mod terminal;

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use termcolor::ColorChoice;

use crate::compare::Comparison;
use crate::config::{Config, OutputFormat};

pub use html::HtmlOutput;
pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a comparison to a writer
    fn render(
        &self,
        comparison: &Comparison,
        old_path: &Path,
        new_path: &Path,
        writer: &mut dyn Write,
    ) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter for the configured format
    pub fn create(config: &Config, color: ColorChoice) -> Box<dyn OutputFormatter> {
        match config.output_format {
            OutputFormat::Terminal => {
                Box::new(TerminalOutput::with_color_choice(color).with_bins(config.bins))
            }
            OutputFormat::Json => {
                let json = if config.compact {
                    JsonOutput::compact()
                } else {
                    JsonOutput::new()
                };
                Box::new(json.with_bins(config.bins))
            }
            OutputFormat::Html => Box::new(HtmlOutput::new().with_bins(config.bins)),
        }
    }
}

/// Render a comparison to stdout
pub fn render_to_stdout(comparison: &Comparison, config: &Config, color: ColorChoice) -> Result<()> {
    let formatter = OutputFactory::create(config, color);
    let mut stdout = std::io::stdout().lock();
    formatter.render(comparison, &config.old_file, &config.new_file, &mut stdout)
}
