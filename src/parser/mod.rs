//! Parser layer for reading delimited text snapshots

mod csv;

use std::path::Path;

use anyhow::{bail, Result};

use crate::model::Table;

pub use self::csv::CsvParser;

/// Trait for parsing tabular data files
pub trait Parser: Send + Sync {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser::comma()), Box::new(CsvParser::tab())],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path) -> Result<Table> {
        let parser = self.get_parser(path)?;
        let table = parser.parse(path)?;
        log::debug!(
            "Parsed {}: {} columns, {} rows",
            path.display(),
            table.column_count(),
            table.row_count()
        );
        Ok(table)
    }
}
