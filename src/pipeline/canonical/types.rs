use serde::Serialize;

use crate::pipeline::import::{CellValue, RawPayload, TabularPayload};

/// Normalized table: single-line unique labels, coerced values, derived digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// One `- Label: value` line per column, taken from the first row.
    pub digest: String,
}

/// The form consumed by the first analysis stage.
///
/// Exactly one representation exists per document; the enum makes the
/// "table or text, never both" rule structural.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalDocument {
    Table(CanonicalTable),
    Text { text: String },
}

impl CanonicalDocument {
    /// Text handed to the ingest stage: the digest for tables, the capped text otherwise.
    pub fn stage_input(&self) -> &str {
        match self {
            Self::Table(table) => &table.digest,
            Self::Text { text } => text,
        }
    }

    pub fn as_table(&self) -> Option<&CanonicalTable> {
        match self {
            Self::Table(table) => Some(table),
            Self::Text { .. } => None,
        }
    }

    /// Turn the document back into a raw payload (used to re-run normalization).
    pub fn to_payload(&self) -> RawPayload {
        match self {
            Self::Table(table) => {
                RawPayload::Tabular(TabularPayload::new(table.columns.clone(), table.rows.clone()))
            }
            Self::Text { text } => RawPayload::Text { text: text.clone() },
        }
    }
}
