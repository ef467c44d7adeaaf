use serde::Serialize;

use super::types::CanonicalTable;
use crate::pipeline::import::CellValue;

/// Inferred kind of a canonical column, over all non-empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Text,
    /// No non-empty cell.
    Empty,
    /// More than one of the above.
    Mixed,
}

impl ColumnKind {
    fn of_cell(cell: &CellValue) -> Option<Self> {
        match cell {
            CellValue::Empty => None,
            CellValue::Integer(_) | CellValue::Float(_) => Some(Self::Numeric),
            CellValue::Bool(_) => Some(Self::Boolean),
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(_) => Some(Self::Text),
        }
    }
}

/// Shape and per-column kinds of a canonical table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub rows: usize,
    pub columns: usize,
    pub column_kinds: Vec<(String, ColumnKind)>,
}

impl TableProfile {
    pub fn of(table: &CanonicalTable) -> Self {
        let column_kinds = table
            .columns
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let kind = table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(index).and_then(ColumnKind::of_cell))
                    .fold(ColumnKind::Empty, |acc, kind| match acc {
                        ColumnKind::Empty => kind,
                        same if same == kind => same,
                        _ => ColumnKind::Mixed,
                    });
                (label.clone(), kind)
            })
            .collect();

        Self {
            rows: table.rows.len(),
            columns: table.columns.len(),
            column_kinds,
        }
    }
}

impl CanonicalTable {
    pub fn profile(&self) -> TableProfile {
        TableProfile::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanonicalTable {
        CanonicalTable {
            columns: vec![
                "Revenue".into(),
                "Region".into(),
                "Audited".into(),
                "Notes".into(),
                "Mixed".into(),
            ],
            rows: vec![
                vec![
                    CellValue::Integer(1),
                    CellValue::Text("EMEA".into()),
                    CellValue::Bool(true),
                    CellValue::Empty,
                    CellValue::Integer(3),
                ],
                vec![
                    CellValue::Float(2.5),
                    CellValue::Text("APAC".into()),
                    CellValue::Bool(false),
                    CellValue::Empty,
                    CellValue::Text("three".into()),
                ],
            ],
            digest: String::new(),
        }
    }

    #[test]
    fn profile_shape() {
        let profile = sample().profile();
        assert_eq!(profile.rows, 2);
        assert_eq!(profile.columns, 5);
    }

    #[test]
    fn profile_column_kinds() {
        let kinds: Vec<ColumnKind> = sample().profile().column_kinds.into_iter().map(|(_, k)| k).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Numeric,
                ColumnKind::Text,
                ColumnKind::Boolean,
                ColumnKind::Empty,
                ColumnKind::Mixed,
            ]
        );
    }

    #[test]
    fn empty_table_profile() {
        let table = CanonicalTable {
            columns: vec!["Revenue".into()],
            rows: vec![],
            digest: String::new(),
        };
        let profile = table.profile();
        assert_eq!(profile.rows, 0);
        assert_eq!(profile.column_kinds, vec![("Revenue".to_string(), ColumnKind::Empty)]);
    }
}
