//! Comparison engine: join two snapshots and difference a value column

mod chart;
mod filter;
mod join;
mod schema_check;

use serde::Serialize;

use crate::config::Config;
use crate::error::CompareError;
use crate::model::{CellValue, Number, Sign, Table};

pub use chart::{Bar, Histogram};
pub use filter::{parse_filter_tokens, try_coerce_all, FilterMode, FilterReport, IdFilter};
pub use join::{inner_join, JoinKey, JoinedRow};
pub use schema_check::{check_columns, ColumnSelection};

/// A matched identifier with its old and new value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub id: CellValue,
    pub old_val: Number,
    pub new_val: Number,
    /// `new_val - old_val`
    pub diff: Number,
}

impl ComparisonRow {
    pub fn sign(&self) -> Sign {
        self.diff.sign()
    }
}

/// Counts of positive, negative and zero diffs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub positive: usize,
    pub negative: usize,
    pub zero: usize,
}

impl Summary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            match row.sign() {
                Sign::Positive => summary.positive += 1,
                Sign::Negative => summary.negative += 1,
                Sign::Zero => summary.zero += 1,
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.zero
    }

    /// Check if any value moved
    pub fn has_changes(&self) -> bool {
        self.positive > 0 || self.negative > 0
    }
}

/// Result of comparing two snapshots
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub id_column: String,
    pub value_column: String,
    pub old_row_count: usize,
    pub new_row_count: usize,
    /// Rows matched by the join, before filtering
    pub joined_row_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterReport>,
    /// Comparison rows in join order
    pub rows: Vec<ComparisonRow>,
    pub summary: Summary,
}

impl Comparison {
    /// Check if any value moved
    pub fn has_changes(&self) -> bool {
        self.summary.has_changes()
    }

    /// Diff values in join order, for the distribution chart
    pub fn diffs(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.diff.as_f64()).collect()
    }

    /// Rows ordered by descending diff; ties keep join order
    pub fn sorted_by_diff(&self) -> Vec<&ComparisonRow> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.diff.total_cmp(&a.diff));
        rows
    }

    /// Per-id bars, largest increase first
    pub fn bars(&self) -> Vec<Bar> {
        self.sorted_by_diff()
            .into_iter()
            .map(|row| Bar {
                label: row.id.display().into_owned(),
                diff: row.diff,
                sign: row.sign(),
            })
            .collect()
    }

    pub fn histogram(&self, bins: usize) -> Histogram {
        Histogram::from_values(&self.diffs(), bins)
    }
}

/// Main comparison engine
pub struct ComparisonEngine {
    config: Config,
}

impl ComparisonEngine {
    /// Create a new engine with configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Compare two tables
    pub fn compare(&self, old_table: &Table, new_table: &Table) -> Result<Comparison, CompareError> {
        check_columns(old_table, new_table)?;
        let selection = ColumnSelection::resolve(old_table, new_table, &self.config)?;

        let mut joined = inner_join(old_table, new_table, &selection);
        let joined_row_count = joined.len();

        let filter = self.config.filter_text().map(|text| {
            let filter = IdFilter::build(text, selection.id_numeric);
            joined.retain(|row| filter.matches(row.id));
            log::debug!(
                "Filter of {} ids ({}) kept {} of {} rows",
                filter.len(),
                filter.mode(),
                joined.len(),
                joined_row_count
            );
            FilterReport {
                tokens: filter.len(),
                mode: filter.mode(),
                rows_removed: joined_row_count - joined.len(),
            }
        });

        let rows = joined
            .iter()
            .map(|row| Self::difference(row, &selection.value_column))
            .collect::<Result<Vec<_>, _>>()?;
        let summary = Summary::from_rows(&rows);

        Ok(Comparison {
            id_column: selection.id_column,
            value_column: selection.value_column,
            old_row_count: old_table.row_count(),
            new_row_count: new_table.row_count(),
            joined_row_count,
            filter,
            rows,
            summary,
        })
    }

    fn difference(row: &JoinedRow<'_>, value_column: &str) -> Result<ComparisonRow, CompareError> {
        let number = |cell: &CellValue, file: &'static str, line: usize| {
            Number::from_cell(cell).ok_or_else(|| CompareError::NonNumericValue {
                column: value_column.to_string(),
                id: row.id.display().into_owned(),
                value: cell.display().into_owned(),
                file,
                line,
            })
        };

        let old_val = number(row.old_val, "old", row.old_line)?;
        let new_val = number(row.new_val, "new", row.new_line)?;
        let diff = new_val
            .minus(old_val)
            .ok_or_else(|| CompareError::DiffOverflow {
                column: value_column.to_string(),
                id: row.id.display().into_owned(),
            })?;

        Ok(ComparisonRow {
            id: row.id.clone(),
            old_val,
            new_val,
            diff,
        })
    }
}

/// Convenience function to compare two tables
pub fn compute_comparison(
    old_table: &Table,
    new_table: &Table,
    config: &Config,
) -> Result<Comparison, CompareError> {
    let engine = ComparisonEngine::new(config.clone());
    engine.compare(old_table, new_table)
}
