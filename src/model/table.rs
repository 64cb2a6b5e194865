//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => b.hash(state),
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::String(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Type of this single value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

/// A row in the table
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A table containing columns and rows
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row, padding short rows with nulls
    pub fn add_row(&mut self, mut cells: Vec<CellValue>, source_line: usize) {
        if cells.len() < self.columns.len() {
            cells.resize(self.columns.len(), CellValue::Null);
        }
        self.rows.push(Row::new(cells, source_line));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in header order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Recompute each column's type from its cells
    pub fn infer_column_types(&mut self) {
        for col_idx in 0..self.columns.len() {
            let inferred = self
                .rows
                .iter()
                .filter_map(|row| row.get(col_idx))
                .fold(CellType::Null, |acc, cell| acc.widen(cell.cell_type()));

            if let Some(col) = self.columns.get_mut(col_idx) {
                col.inferred_type = inferred;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec![Column::new("id"), Column::new("v")]);
        table.add_row(vec![CellValue::Int(1), CellValue::Float(2.5)], 2);
        table.add_row(vec![CellValue::Int(2)], 3);
        table.infer_column_types();
        table
    }

    #[test]
    fn test_add_row_pads_short_rows() {
        let table = sample();
        assert_eq!(table.rows[1].cells.len(), 2);
        assert!(table.rows[1].get(1).is_some_and(CellValue::is_null));
    }

    #[test]
    fn test_infer_column_types() {
        let table = sample();
        assert_eq!(table.column("id").map(|c| c.inferred_type), Some(CellType::Int));
        assert_eq!(table.column("v").map(|c| c.inferred_type), Some(CellType::Float));
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column_index("v"), Some(1));
        assert_eq!(table.column_index("missing"), None);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "v"]);
    }

    #[test]
    fn test_cross_type_numeric_equality() {
        assert_eq!(CellValue::Int(1), CellValue::Float(1.0));
        assert_ne!(CellValue::Int(1), CellValue::from("1"));
    }
}
