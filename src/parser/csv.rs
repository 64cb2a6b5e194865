//! CSV file parser

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::model::{CellValue, Column, Table};

use super::Parser;

/// Parser for comma or tab delimited files with a header row
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    /// Comma separated values (`.csv`, `.txt`)
    pub fn comma() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab separated values (`.tsv`, `.tab`)
    pub fn tab() -> Self {
        Self { delimiter: b'\t' }
    }

    /// Read a whole table from any reader
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        // Read headers
        let headers = csv_reader
            .headers()
            .context("Failed to read CSV headers")?
            .clone();

        if headers.iter().all(|h| h.trim().is_empty()) {
            bail!("File has no header row");
        }

        let columns: Vec<Column> = headers
            .iter()
            .map(|name| Column::new(name.trim()))
            .collect();

        let mut table = Table::new(columns);

        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result.with_context(|| format!("Failed to read CSV row {}", line_num + 2))?; // +2 for 1-indexing and header

            let mut cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
            cells.truncate(table.column_count());

            table.add_row(cells, line_num + 2);
        }

        table.infer_column_types();

        Ok(table)
    }
}

impl Parser for CsvParser {
    fn parse(&self, path: &Path) -> Result<Table> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        self.parse_reader(BufReader::new(file))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        match self.delimiter {
            b'\t' => matches!(ext.to_lowercase().as_str(), "tsv" | "tab"),
            _ => matches!(ext.to_lowercase().as_str(), "csv" | "txt"),
        }
    }
}

/// Parse a string value into a CellValue with type inference
pub(crate) fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    // Check for empty/null
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed == "NA" {
        return CellValue::Null;
    }

    // Try parsing as boolean
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("yes") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("no") {
        return CellValue::Bool(false);
    }

    // Try parsing as integer
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    // Try parsing as float
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    // Try parsing as date
    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    // Try parsing as datetime (ISO 8601)
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    // Default to string
    CellValue::String(Cow::Owned(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(""), CellValue::Null);
        assert_eq!(parse_cell_value("null"), CellValue::Null);
        assert_eq!(parse_cell_value("true"), CellValue::Bool(true));
        assert_eq!(parse_cell_value("false"), CellValue::Bool(false));
        assert_eq!(parse_cell_value("42"), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.14"), CellValue::Float(3.14));
        assert_eq!(
            parse_cell_value("hello"),
            CellValue::String(Cow::Owned("hello".to_string()))
        );
    }

    #[test]
    fn test_parse_reader_infers_types() {
        let data = "id,name,score\n1,alice,10\n2,bob,12.5\n3,carol,\n";
        let table = CsvParser::comma().parse_reader(data.as_bytes()).unwrap();

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns[0].inferred_type, CellType::Int);
        assert_eq!(table.columns[1].inferred_type, CellType::String);
        assert_eq!(table.columns[2].inferred_type, CellType::Float);
        assert_eq!(table.rows[0].source_line, 2);
        assert!(table.rows[2].cells[2].is_null());
    }

    #[test]
    fn test_short_and_long_rows() {
        let data = "id,v\n1\n2,3,extra\n";
        let table = CsvParser::comma().parse_reader(data.as_bytes()).unwrap();

        assert_eq!(table.rows[0].cells, vec![CellValue::Int(1), CellValue::Null]);
        assert_eq!(table.rows[1].cells, vec![CellValue::Int(2), CellValue::Int(3)]);
    }

    #[test]
    fn test_tab_delimited() {
        let data = "id\tv\n7\t1.5\n";
        let table = CsvParser::tab().parse_reader(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0].cells, vec![CellValue::Int(7), CellValue::Float(1.5)]);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(CsvParser::comma().parse_reader("".as_bytes()).is_err());
    }
}
