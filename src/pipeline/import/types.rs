use serde::{Deserialize, Serialize};

/// One decoded cell. Raw CSV cells arrive as `Text`; spreadsheets carry native types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Build a cell from raw text; the empty string becomes `Empty`.
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            Self::Empty
        } else {
            Self::Text(raw.to_string())
        }
    }

    /// Missing, or text that is only whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Decoded rows and columns. Each row is positionally aligned with `columns`
/// (cell `i` belongs to `columns[i]`), so duplicate labels survive decoding and
/// are resolved by the canonicalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TabularPayload {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TabularPayload {
    /// Build a payload, padding short rows with `Empty` and dropping cells past the last column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }
}

/// Tagged output of the format loader. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawPayload {
    Tabular(TabularPayload),
    Text { text: String },
    StructuredRecord { value: serde_json::Value },
    Unsupported { diagnostic: String },
}

impl RawPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tabular(_) => "tabular",
            Self::Text { .. } => "text",
            Self::StructuredRecord { .. } => "structured_record",
            Self::Unsupported { .. } => "unsupported",
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}
