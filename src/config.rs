//! Configuration handling for csvcompare

use std::path::PathBuf;

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 20;

/// Output format for comparison results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for a comparison run
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the old snapshot
    pub old_file: PathBuf,
    /// Path to the new snapshot
    pub new_file: PathBuf,
    /// Column used to join old and new rows; first column when unset
    pub id_column: Option<String>,
    /// Column whose values are differenced; first non-id column when unset
    pub value_column: Option<String>,
    /// Free text list of ids to keep (comma or newline separated)
    pub id_filter: Option<String>,
    /// Output format
    pub output_format: OutputFormat,
    /// Number of histogram bins
    pub bins: usize,
    /// Only show summary counts
    pub summary_only: bool,
    /// Single-line JSON instead of pretty-printed
    pub compact: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            old_file: PathBuf::new(),
            new_file: PathBuf::new(),
            id_column: None,
            value_column: None,
            id_filter: None,
            output_format: OutputFormat::default(),
            bins: DEFAULT_BINS,
            summary_only: false,
            compact: false,
        }
    }
}

impl Config {
    /// Create a new Config with file paths
    pub fn new(old_file: PathBuf, new_file: PathBuf) -> Self {
        Self {
            old_file,
            new_file,
            ..Default::default()
        }
    }

    /// Set the identifier column
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    /// Set the value column
    pub fn with_value_column(mut self, column: impl Into<String>) -> Self {
        self.value_column = Some(column.into());
        self
    }

    /// Set the raw id filter text
    pub fn with_id_filter(mut self, text: impl Into<String>) -> Self {
        self.id_filter = Some(text.into());
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the histogram bin count
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins.max(1);
        self
    }

    /// Enable summary-only mode
    pub fn with_summary_only(mut self, summary_only: bool) -> Self {
        self.summary_only = summary_only;
        self
    }

    /// Emit compact JSON
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Filter text, or `None` when it is absent or blank
    pub fn filter_text(&self) -> Option<&str> {
        self.id_filter
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("HTML".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert!("unified".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_blank_filter_is_ignored() {
        let config = Config::default().with_id_filter(" \n , ");
        assert_eq!(config.filter_text(), Some(" \n , "));
        assert_eq!(Config::default().with_id_filter("  \n").filter_text(), None);
        assert_eq!(Config::default().filter_text(), None);
    }

    #[test]
    fn test_bins_never_zero() {
        assert_eq!(Config::default().with_bins(0).bins, 1);
        assert_eq!(Config::default().bins, DEFAULT_BINS);
    }
}
