//! Column validation and selection

use crate::config::Config;
use crate::error::CompareError;
use crate::model::Table;

/// Ensure every column of the old table also exists in the new table
pub fn check_columns(old_table: &Table, new_table: &Table) -> Result<(), CompareError> {
    let new_names: Vec<_> = new_table.column_names().collect();

    let missing: Vec<String> = old_table
        .column_names()
        .filter(|name| !new_names.contains(name))
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(CompareError::SchemaMismatch { missing });
    }

    let added: Vec<_> = new_names
        .iter()
        .filter(|name| old_table.column_index(name).is_none())
        .collect();
    if !added.is_empty() {
        log::debug!("New file has extra columns that are not compared: {:?}", added);
    }

    Ok(())
}

/// Identifier and value columns resolved to positions in both tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub id_column: String,
    pub value_column: String,
    pub old_id: usize,
    pub old_value: usize,
    pub new_id: usize,
    pub new_value: usize,
    /// Identifier column holds only numbers (and nulls) in both tables
    pub id_numeric: bool,
}

impl ColumnSelection {
    /// Resolve the configured columns, defaulting the identifier to the
    /// first column and the value to the first remaining column.
    pub fn resolve(
        old_table: &Table,
        new_table: &Table,
        config: &Config,
    ) -> Result<Self, CompareError> {
        let id_column = match &config.id_column {
            Some(name) => name.clone(),
            None => old_table
                .columns
                .first()
                .map(|c| c.name.clone())
                .ok_or_else(|| CompareError::UnknownColumn {
                    column: "(first column)".to_string(),
                })?,
        };

        let value_column = match &config.value_column {
            Some(name) => name.clone(),
            None => old_table
                .column_names()
                .find(|name| *name != id_column)
                .map(str::to_string)
                .ok_or_else(|| CompareError::NoValueColumn {
                    id_column: id_column.clone(),
                })?,
        };

        if id_column == value_column {
            return Err(CompareError::SameColumn { column: id_column });
        }

        let locate = |table: &Table, name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| CompareError::UnknownColumn {
                    column: name.to_string(),
                })
        };

        let old_id = locate(old_table, id_column.as_str())?;
        let old_value = locate(old_table, value_column.as_str())?;
        let new_id = locate(new_table, id_column.as_str())?;
        let new_value = locate(new_table, value_column.as_str())?;

        let id_type = old_table.columns[old_id]
            .inferred_type
            .widen(new_table.columns[new_id].inferred_type);

        Ok(Self {
            id_column,
            value_column,
            old_id,
            old_value,
            new_id,
            new_value,
            id_numeric: id_type.is_numeric(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellType, Column};

    fn table(columns: &[(&str, CellType)]) -> Table {
        Table::new(
            columns
                .iter()
                .map(|(name, ty)| Column::with_type(*name, *ty))
                .collect(),
        )
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let old = table(&[("id", CellType::Int), ("v", CellType::Int), ("x", CellType::Int)]);
        let new = table(&[("id", CellType::Int), ("v", CellType::Int)]);

        assert_eq!(
            check_columns(&old, &new),
            Err(CompareError::SchemaMismatch {
                missing: vec!["x".to_string()]
            })
        );
    }

    #[test]
    fn test_extra_new_columns_are_allowed() {
        let old = table(&[("id", CellType::Int), ("v", CellType::Int)]);
        let new = table(&[("v", CellType::Int), ("id", CellType::Int), ("y", CellType::String)]);
        assert!(check_columns(&old, &new).is_ok());
    }

    #[test]
    fn test_resolve_defaults() {
        let old = table(&[("id", CellType::Int), ("v", CellType::Float)]);
        let new = table(&[("v", CellType::Float), ("id", CellType::Int)]);

        let sel = ColumnSelection::resolve(&old, &new, &Config::default()).unwrap();
        assert_eq!(sel.id_column, "id");
        assert_eq!(sel.value_column, "v");
        assert_eq!((sel.old_id, sel.old_value), (0, 1));
        assert_eq!((sel.new_id, sel.new_value), (1, 0));
        assert!(sel.id_numeric);
    }

    #[test]
    fn test_resolve_rejects_same_column() {
        let old = table(&[("id", CellType::Int), ("v", CellType::Int)]);
        let config = Config::default().with_id_column("v").with_value_column("v");

        assert_eq!(
            ColumnSelection::resolve(&old, &old, &config),
            Err(CompareError::SameColumn {
                column: "v".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_unknown_and_lone_columns() {
        let old = table(&[("id", CellType::Int), ("v", CellType::Int)]);
        let config = Config::default().with_value_column("nope");
        assert_eq!(
            ColumnSelection::resolve(&old, &old, &config),
            Err(CompareError::UnknownColumn {
                column: "nope".to_string()
            })
        );

        let lone = table(&[("id", CellType::Int)]);
        assert!(matches!(
            ColumnSelection::resolve(&lone, &lone, &Config::default()),
            Err(CompareError::NoValueColumn { .. })
        ));
    }

    #[test]
    fn test_mixed_id_column_is_not_numeric() {
        let old = table(&[("id", CellType::Int), ("v", CellType::Int)]);
        let new = table(&[("id", CellType::Mixed), ("v", CellType::Int)]);

        let sel = ColumnSelection::resolve(&old, &new, &Config::default()).unwrap();
        assert!(!sel.id_numeric);
    }
}
