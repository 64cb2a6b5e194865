//! Colored terminal output

use std::io::{IsTerminal, Write};
use std::path::Path;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Buffer, Color, ColorChoice, ColorSpec, WriteColor};

use crate::compare::{Comparison, Histogram};
use crate::config::DEFAULT_BINS;
use crate::model::Sign;

use super::OutputFormatter;

const CHART_WIDTH: usize = 40;

/// Terminal output with colors
pub struct TerminalOutput {
    color_choice: ColorChoice,
    bins: usize,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self::with_color_choice(ColorChoice::Auto)
    }

    pub fn with_color_choice(color_choice: ColorChoice) -> Self {
        Self {
            color_choice,
            bins: DEFAULT_BINS,
        }
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    fn buffer(&self) -> Buffer {
        let colored = match self.color_choice {
            ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        };
        if colored {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        }
    }

    fn write_header(&self, out: &mut Buffer, old_path: &Path, new_path: &Path) -> Result<()> {
        writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            out,
            " csvcompare: {} → {}",
            old_path.display(),
            new_path.display()
        )?;
        writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(out)?;
        Ok(())
    }

    fn write_overview(&self, comparison: &Comparison, out: &mut Buffer) -> Result<()> {
        writeln!(
            out,
            "Comparing '{}' by '{}': {} → {} rows, {} matched",
            comparison.value_column,
            comparison.id_column,
            comparison.old_row_count,
            comparison.new_row_count,
            comparison.joined_row_count
        )?;
        if let Some(filter) = &comparison.filter {
            writeln!(
                out,
                "Filter: {} ids matched as {}, {} rows removed",
                filter.tokens, filter.mode, filter.rows_removed
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_table(&self, comparison: &Comparison, out: &mut Buffer) -> Result<()> {
        writeln!(out, "Difference Table:")?;

        let mut builder = Builder::default();
        builder.push_record([
            comparison.id_column.clone(),
            "old_val".to_string(),
            "new_val".to_string(),
            "diff".to_string(),
        ]);
        for row in &comparison.rows {
            builder.push_record([
                row.id.display().into_owned(),
                row.old_val.to_string(),
                row.new_val.to_string(),
                row.diff.to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        writeln!(out, "{}", table)?;
        writeln!(out)?;
        Ok(())
    }

    fn write_summary(&self, comparison: &Comparison, out: &mut Buffer) -> Result<()> {
        let summary = &comparison.summary;
        writeln!(out, "Summary:")?;
        for (sign, marker, label, count) in [
            (Sign::Positive, "▲", "Positive differences", summary.positive),
            (Sign::Negative, "▼", "Negative differences", summary.negative),
            (Sign::Zero, "=", "Zero differences", summary.zero),
        ] {
            write!(out, "  ")?;
            out.set_color(&sign_spec(sign))?;
            write!(out, "{}", marker)?;
            out.reset()?;
            writeln!(out, " {}: {}", label, count)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_histogram(&self, histogram: &Histogram, out: &mut Buffer) -> Result<()> {
        writeln!(out, "Histogram of Differences (new - old):")?;

        let max = histogram.max_count().max(1);
        let labels: Vec<String> = histogram
            .bins()
            .map(|(lo, hi, _)| format!("[{:.2}, {:.2})", lo, hi))
            .collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        for (label, (_, _, count)) in labels.iter().zip(histogram.bins()) {
            let len = scaled(count as f64, max as f64);
            writeln!(
                out,
                "  {:<width$}  {} {}",
                label,
                "█".repeat(len),
                count,
                width = label_width
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_bars(&self, comparison: &Comparison, out: &mut Buffer) -> Result<()> {
        writeln!(out, "Per-ID Differences:")?;

        let bars = comparison.bars();
        let max = bars
            .iter()
            .map(|b| b.diff.as_f64().abs())
            .fold(0.0, f64::max);
        let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);

        for bar in &bars {
            let len = if max > 0.0 {
                scaled(bar.diff.as_f64().abs(), max)
            } else {
                0
            };
            write!(out, "  {:<width$}  ", bar.label, width = label_width)?;
            out.set_color(&sign_spec(bar.sign))?;
            write!(out, "{}", "█".repeat(len))?;
            out.reset()?;
            match bar.sign {
                Sign::Positive => writeln!(out, " +{}", bar.diff)?,
                _ => writeln!(out, " {}", bar.diff)?,
            }
        }
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(
        &self,
        comparison: &Comparison,
        old_path: &Path,
        new_path: &Path,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let mut out = self.buffer();
        self.write_header(&mut out, old_path, new_path)?;
        self.write_overview(comparison, &mut out)?;

        if comparison.rows.is_empty() {
            writeln!(out, "No matching rows.")?;
            writeln!(out)?;
            self.write_summary(comparison, &mut out)?;
        } else {
            self.write_table(comparison, &mut out)?;
            self.write_summary(comparison, &mut out)?;
            self.write_histogram(&comparison.histogram(self.bins), &mut out)?;
            self.write_bars(comparison, &mut out)?;
        }

        writer.write_all(out.as_slice())?;
        Ok(())
    }
}

fn sign_spec(sign: Sign) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match sign {
        Sign::Positive => spec.set_fg(Some(Color::Green)),
        Sign::Negative => spec.set_fg(Some(Color::Red)),
        Sign::Zero => spec.set_fg(Some(Color::Ansi256(244))),
    };
    spec
}

/// Bar length for `value` out of `max`, at least one cell for non-zero values
fn scaled(value: f64, max: f64) -> usize {
    if value <= 0.0 {
        return 0;
    }
    ((value / max * CHART_WIDTH as f64).round() as usize).max(1)
}
