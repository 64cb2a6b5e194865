//! Inner join of old and new rows on the identifier column

use rustc_hash::FxHashMap;

use crate::model::{CellValue, Number, Table};

use super::schema_check::ColumnSelection;

static NULL_CELL: CellValue = CellValue::Null;

/// Hashable identity of an identifier cell. Integral floats collapse onto
/// integers so that `1` and `1.0` land on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    Int(i64),
    Float(u64),
    Other(CellValue),
}

impl JoinKey {
    pub fn of(cell: &CellValue) -> Self {
        match cell {
            CellValue::Int(i) => JoinKey::Int(*i),
            CellValue::Float(f) => Self::from_f64(*f),
            other => JoinKey::Other(other.clone()),
        }
    }

    fn from_f64(f: f64) -> Self {
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            JoinKey::Int(f as i64)
        } else if f.is_nan() {
            JoinKey::Float(f64::NAN.to_bits())
        } else {
            JoinKey::Float(f.to_bits())
        }
    }
}

impl From<Number> for JoinKey {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => JoinKey::Int(i),
            Number::Float(f) => Self::from_f64(f),
        }
    }
}

/// One matched pair of rows, borrowing the selected cells
#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a> {
    pub id: &'a CellValue,
    pub old_val: &'a CellValue,
    pub new_val: &'a CellValue,
    /// Source lines of the matched rows
    pub old_line: usize,
    pub new_line: usize,
}

/// Join rows whose identifier appears in both tables.
///
/// Rows come out in old-table order; an old row matching several new rows
/// yields one joined row per match, in new-table order. Unmatched rows on
/// either side are dropped.
pub fn inner_join<'a>(
    old_table: &'a Table,
    new_table: &'a Table,
    selection: &ColumnSelection,
) -> Vec<JoinedRow<'a>> {
    let mut index: FxHashMap<JoinKey, Vec<usize>> = FxHashMap::default();
    for (idx, row) in new_table.rows.iter().enumerate() {
        let id = row.get(selection.new_id).unwrap_or(&NULL_CELL);
        index.entry(JoinKey::of(id)).or_default().push(idx);
    }

    let mut joined = Vec::new();
    for old_row in &old_table.rows {
        let id = old_row.get(selection.old_id).unwrap_or(&NULL_CELL);
        let Some(matches) = index.get(&JoinKey::of(id)) else {
            continue;
        };

        let old_val = old_row.get(selection.old_value).unwrap_or(&NULL_CELL);
        for &new_idx in matches {
            let new_row = &new_table.rows[new_idx];
            joined.push(JoinedRow {
                id,
                old_val,
                new_val: new_row.get(selection.new_value).unwrap_or(&NULL_CELL),
                old_line: old_row.source_line,
                new_line: new_row.source_line,
            });
        }
    }

    log::debug!(
        "Joined {} old rows with {} new rows on '{}': {} matches",
        old_table.row_count(),
        new_table.row_count(),
        selection.id_column,
        joined.len()
    );

    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::parser::CsvParser;

    fn parse(data: &str) -> Table {
        CsvParser::comma().parse_reader(data.as_bytes()).unwrap()
    }

    fn ids(rows: &[JoinedRow<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn test_unmatched_rows_are_dropped() {
        let old = parse("id,v\n1,10\n2,20\n3,30\n");
        let new = parse("id,v\n3,31\n1,11\n4,40\n");
        let sel = ColumnSelection::resolve(&old, &new, &Config::default()).unwrap();

        let joined = inner_join(&old, &new, &sel);
        assert_eq!(ids(&joined), vec!["1", "3"]);
        assert_eq!(joined[0].new_val, &CellValue::Int(11));
        assert_eq!(joined[1].old_val, &CellValue::Int(30));
        assert_eq!((joined[1].old_line, joined[1].new_line), (4, 2));
    }

    #[test]
    fn test_duplicate_ids_produce_every_pair() {
        let old = parse("id,v\na,1\na,2\n");
        let new = parse("id,v\na,10\na,20\n");
        let sel = ColumnSelection::resolve(&old, &new, &Config::default()).unwrap();

        let pairs: Vec<_> = inner_join(&old, &new, &sel)
            .iter()
            .map(|r| (r.old_val.to_string(), r.new_val.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "10".to_string()),
                ("1".to_string(), "20".to_string()),
                ("2".to_string(), "10".to_string()),
                ("2".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_integral_float_ids_join_integers() {
        let old = parse("id,v\n1,10\n2.5,20\n");
        let new = parse("id,v\n1.0,15\n2.5,25\n");
        let sel = ColumnSelection::resolve(&old, &new, &Config::default()).unwrap();

        assert_eq!(inner_join(&old, &new, &sel).len(), 2);
    }

    #[test]
    fn test_join_key_normalisation() {
        assert_eq!(JoinKey::of(&CellValue::Float(3.0)), JoinKey::Int(3));
        assert_eq!(JoinKey::of(&CellValue::Float(-0.0)), JoinKey::Int(0));
        assert_eq!(JoinKey::from(Number::Float(7.0)), JoinKey::Int(7));
        assert_ne!(JoinKey::of(&CellValue::from("3")), JoinKey::Int(3));
    }
}
