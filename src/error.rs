//! Errors raised while comparing two tables

use thiserror::Error;

/// Reasons a comparison cannot be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompareError {
    #[error("both files must have the same columns; missing from new file: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("identifier column '{column}' cannot also be the value column")]
    SameColumn { column: String },

    #[error("no column left to compare besides identifier column '{id_column}'")]
    NoValueColumn { id_column: String },

    #[error("column '{column}' is not numeric: value '{value}' for id {id} ({file} file, line {line})")]
    NonNumericValue {
        column: String,
        id: String,
        value: String,
        file: &'static str,
        line: usize,
    },

    #[error("difference in column '{column}' for id {id} is too large to represent")]
    DiffOverflow { column: String, id: String },
}
