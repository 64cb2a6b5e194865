//! HTML report output

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::compare::{Bar, Comparison, Histogram};
use crate::config::DEFAULT_BINS;
use crate::model::Sign;

use super::OutputFormatter;

const SVG_WIDTH: f64 = 720.0;
const SVG_HEIGHT: f64 = 280.0;
const MARGIN: f64 = 40.0;
/// Above this many bars the per-id axis labels are left to tooltips
const MAX_BAR_LABELS: usize = 40;

/// HTML report output
pub struct HtmlOutput {
    bins: usize,
}

impl HtmlOutput {
    pub fn new() -> Self {
        Self { bins: DEFAULT_BINS }
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }
}

impl Default for HtmlOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for HtmlOutput {
    fn render(
        &self,
        comparison: &Comparison,
        old_path: &Path,
        new_path: &Path,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let old_name = html_escape(old_path.display().to_string());
        let new_name = html_escape(new_path.display().to_string());

        // HTML header
        writeln!(writer, "<!DOCTYPE html>")?;
        writeln!(writer, "<html lang=\"en\">")?;
        writeln!(writer, "<head>")?;
        writeln!(writer, "  <meta charset=\"UTF-8\">")?;
        writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
        writeln!(writer, "  <title>csvcompare: {} → {}</title>", old_name, new_name)?;
        writeln!(writer, "  <style>")?;
        writeln!(writer, "{}", CSS_STYLES)?;
        writeln!(writer, "  </style>")?;
        writeln!(writer, "</head>")?;
        writeln!(writer, "<body>")?;

        // Header
        writeln!(writer, "  <div class=\"header\">")?;
        writeln!(writer, "    <h1>csvcompare</h1>")?;
        writeln!(writer, "    <p class=\"files\">{} → {}</p>", old_name, new_name)?;
        writeln!(
            writer,
            "    <p class=\"files\">{} by {}: {} → {} rows, {} matched</p>",
            html_escape(&comparison.value_column),
            html_escape(&comparison.id_column),
            comparison.old_row_count,
            comparison.new_row_count,
            comparison.joined_row_count
        )?;
        if let Some(filter) = &comparison.filter {
            writeln!(
                writer,
                "    <p class=\"files\">Filter: {} ids matched as {}, {} rows removed</p>",
                filter.tokens,
                html_escape(filter.mode.to_string()),
                filter.rows_removed
            )?;
        }
        writeln!(writer, "  </div>")?;

        // Summary
        let summary = &comparison.summary;
        writeln!(writer, "  <div class=\"summary\">")?;
        writeln!(writer, "    <div class=\"stat positive\"><span class=\"num\">▲ {}</span><span class=\"label\">positive</span></div>",
            summary.positive)?;
        writeln!(writer, "    <div class=\"stat negative\"><span class=\"num\">▼ {}</span><span class=\"label\">negative</span></div>",
            summary.negative)?;
        writeln!(writer, "    <div class=\"stat zero\"><span class=\"num\">= {}</span><span class=\"label\">zero</span></div>",
            summary.zero)?;
        writeln!(writer, "  </div>")?;

        if comparison.rows.is_empty() {
            writeln!(writer, "  <div class=\"section\"><p>No matching rows.</p></div>")?;
        } else {
            writeln!(writer, "  <div class=\"section\">")?;
            writeln!(writer, "    <h2>Histogram of Differences</h2>")?;
            write_histogram_svg(writer, &comparison.histogram(self.bins))?;
            writeln!(writer, "  </div>")?;

            writeln!(writer, "  <div class=\"section\">")?;
            writeln!(writer, "    <h2>Change per {}</h2>", html_escape(&comparison.id_column))?;
            write_bars_svg(writer, &comparison.bars())?;
            writeln!(writer, "  </div>")?;

            writeln!(writer, "  <div class=\"section\">")?;
            writeln!(writer, "    <h2>Difference Table</h2>")?;
            write_rows_table(writer, comparison)?;
            writeln!(writer, "  </div>")?;
        }

        writeln!(writer, "</body>")?;
        writeln!(writer, "</html>")?;

        Ok(())
    }
}

fn write_rows_table(writer: &mut dyn Write, comparison: &Comparison) -> Result<()> {
    writeln!(writer, "    <table>")?;
    writeln!(
        writer,
        "      <tr><th>{}</th><th>old_val</th><th>new_val</th><th>diff</th></tr>",
        html_escape(&comparison.id_column)
    )?;

    for row in &comparison.rows {
        writeln!(writer, "      <tr>")?;
        writeln!(writer, "        <td>{}</td>", html_escape(row.id.display()))?;
        writeln!(writer, "        <td>{}</td>", row.old_val)?;
        writeln!(writer, "        <td>{}</td>", row.new_val)?;
        writeln!(writer, "        <td class=\"{}\">{}</td>", row.sign(), row.diff)?;
        writeln!(writer, "      </tr>")?;
    }

    writeln!(writer, "    </table>")?;
    Ok(())
}

fn write_histogram_svg(writer: &mut dyn Write, histogram: &Histogram) -> Result<()> {
    let plot_w = SVG_WIDTH - 2.0 * MARGIN;
    let plot_h = SVG_HEIGHT - 2.0 * MARGIN;
    let bar_w = plot_w / histogram.counts.len().max(1) as f64;
    let max = histogram.max_count().max(1) as f64;
    let base_y = MARGIN + plot_h;

    writeln!(
        writer,
        "    <svg viewBox=\"0 0 {} {}\" class=\"chart\">",
        SVG_WIDTH, SVG_HEIGHT
    )?;
    for (i, (lo, hi, count)) in histogram.bins().enumerate() {
        let h = count as f64 / max * plot_h;
        writeln!(
            writer,
            "      <rect class=\"bin\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"><title>[{:.2}, {:.2}): {}</title></rect>",
            MARGIN + i as f64 * bar_w,
            base_y - h,
            bar_w,
            h,
            lo,
            hi,
            count
        )?;
    }
    writeln!(
        writer,
        "      <line class=\"axis\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
        MARGIN,
        base_y,
        MARGIN + plot_w,
        base_y
    )?;
    if let (Some(lo), Some(hi)) = (histogram.edges.first(), histogram.edges.last()) {
        writeln!(
            writer,
            "      <text x=\"{}\" y=\"{}\">{:.2}</text>",
            MARGIN,
            base_y + 16.0,
            lo
        )?;
        writeln!(
            writer,
            "      <text x=\"{}\" y=\"{}\" text-anchor=\"end\">{:.2}</text>",
            MARGIN + plot_w,
            base_y + 16.0,
            hi
        )?;
    }
    writeln!(
        writer,
        "      <text x=\"{}\" y=\"{}\" text-anchor=\"middle\">Difference (new - old)</text>",
        SVG_WIDTH / 2.0,
        SVG_HEIGHT - 4.0
    )?;
    writeln!(writer, "    </svg>")?;
    Ok(())
}

fn write_bars_svg(writer: &mut dyn Write, bars: &[Bar]) -> Result<()> {
    let plot_w = SVG_WIDTH - 2.0 * MARGIN;
    let plot_h = SVG_HEIGHT - 2.0 * MARGIN;
    let bar_w = plot_w / bars.len().max(1) as f64;

    let top = bars.iter().map(|b| b.diff.as_f64()).fold(0.0, f64::max);
    let bottom = bars.iter().map(|b| b.diff.as_f64()).fold(0.0, f64::min);
    let span = if top - bottom > 0.0 { top - bottom } else { 1.0 };
    let zero_y = MARGIN + top / span * plot_h;

    writeln!(
        writer,
        "    <svg viewBox=\"0 0 {} {}\" class=\"chart\">",
        SVG_WIDTH, SVG_HEIGHT
    )?;
    for (i, bar) in bars.iter().enumerate() {
        let value = bar.diff.as_f64();
        let h = value.abs() / span * plot_h;
        let y = if value > 0.0 { zero_y - h } else { zero_y };
        let x = MARGIN + i as f64 * bar_w;
        writeln!(
            writer,
            "      <rect fill=\"{}\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"><title>{}: {}</title></rect>",
            bar_fill(bar.sign),
            x,
            y,
            bar_w * 0.9,
            h,
            html_escape(&bar.label),
            bar.diff
        )?;
        if bars.len() <= MAX_BAR_LABELS {
            let label_x = x + bar_w / 2.0;
            let label_y = SVG_HEIGHT - MARGIN + 12.0;
            writeln!(
                writer,
                "      <text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\" transform=\"rotate(90 {:.1} {:.1})\">{}</text>",
                label_x,
                label_y,
                label_x,
                label_y,
                html_escape(&bar.label)
            )?;
        }
    }
    writeln!(
        writer,
        "      <line class=\"axis\" x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\"/>",
        MARGIN,
        zero_y,
        MARGIN + plot_w,
        zero_y
    )?;
    writeln!(writer, "    </svg>")?;
    Ok(())
}

fn bar_fill(sign: Sign) -> &'static str {
    match sign {
        Sign::Positive => "var(--green)",
        Sign::Negative => "var(--red)",
        Sign::Zero => "var(--gray)",
    }
}

fn html_escape(s: impl AsRef<str>) -> String {
    s.as_ref()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS_STYLES: &str = r#"
    :root {
      --bg: #1a1b26;
      --fg: #a9b1d6;
      --accent: #7aa2f7;
      --green: #9ece6a;
      --red: #f7768e;
      --gray: #787c99;
      --border: #414868;
    }

    * { box-sizing: border-box; margin: 0; padding: 0; }

    body {
      font-family: 'JetBrains Mono', 'Fira Code', monospace;
      background: var(--bg);
      color: var(--fg);
      padding: 2rem;
      line-height: 1.6;
    }

    .header {
      border-bottom: 2px solid var(--border);
      padding-bottom: 1rem;
      margin-bottom: 2rem;
    }

    .header h1 {
      color: var(--accent);
      font-size: 2rem;
      font-weight: 600;
    }

    .header .files {
      opacity: 0.8;
      margin-top: 0.5rem;
    }

    .summary {
      display: flex;
      gap: 2rem;
      margin-bottom: 2rem;
    }

    .stat {
      display: flex;
      flex-direction: column;
      padding: 1rem;
      border-radius: 8px;
      background: rgba(255,255,255,0.05);
    }

    .stat .num {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .stat.positive .num { color: var(--green); }
    .stat.negative .num { color: var(--red); }
    .stat.zero .num { color: var(--gray); }

    .section {
      margin-bottom: 2rem;
    }

    .section h2 {
      color: var(--accent);
      font-size: 1.25rem;
      margin-bottom: 1rem;
      padding-bottom: 0.5rem;
      border-bottom: 1px solid var(--border);
    }

    .chart {
      width: 100%;
      max-width: 960px;
      overflow: visible;
    }

    .chart .bin { fill: var(--accent); stroke: var(--bg); }
    .chart .axis { stroke: var(--fg); stroke-width: 1; }
    .chart text { fill: var(--fg); font-size: 10px; }

    table {
      width: 100%;
      border-collapse: collapse;
      margin-bottom: 1rem;
    }

    th, td {
      text-align: left;
      padding: 0.75rem;
      border: 1px solid var(--border);
    }

    th {
      background: rgba(255,255,255,0.05);
      font-weight: 600;
    }

    td.positive { color: var(--green); }
    td.negative { color: var(--red); }
    td.zero { color: var(--gray); }
"#;
