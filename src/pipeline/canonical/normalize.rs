use indexmap::IndexMap;

use super::profile::TableProfile;
use super::types::{CanonicalDocument, CanonicalTable};
use crate::pipeline::import::{CellValue, RawPayload, TabularPayload};
use crate::pipeline_config::DEFAULT_MAX_TEXT_CHARS;

/// Digest value shown when the first surviving row has no value for a column.
const MISSING_VALUE: &str = "n/a";

/// Normalizes raw payloads. Infallible: coercion is best-effort.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    max_chars: usize,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXT_CHARS)
    }
}

impl Canonicalizer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn normalize(&self, payload: RawPayload) -> CanonicalDocument {
        match payload {
            RawPayload::Tabular(table) => CanonicalDocument::Table(self.normalize_table(table)),
            RawPayload::Text { text } => self.capped_text(text.trim()),
            RawPayload::StructuredRecord { value } => {
                let serialized =
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                self.capped_text(serialized.trim())
            }
            RawPayload::Unsupported { diagnostic } => self.capped_text(diagnostic.trim()),
        }
    }

    fn normalize_table(&self, table: TabularPayload) -> CanonicalTable {
        let TabularPayload { columns, rows } = table;
        let input_rows = rows.len();

        // Label -> source column index. Re-inserting a label keeps its first
        // position but points it at the later column (last write wins).
        let mut layout: IndexMap<String, usize> = IndexMap::with_capacity(columns.len());
        for (index, raw) in columns.iter().enumerate() {
            layout.insert(canonical_label(raw), index);
        }
        if layout.len() < columns.len() {
            tracing::debug!(
                declared = columns.len(),
                distinct = layout.len(),
                "Column labels collided after trimming; later columns win"
            );
        }

        let rows = rows
            .into_iter()
            .filter(|row| !row.iter().all(CellValue::is_empty))
            .map(|row| {
                layout
                    .values()
                    .map(|&index| coerce_cell(row.get(index).cloned().unwrap_or(CellValue::Empty)))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let columns = layout.into_keys().collect::<Vec<_>>();
        let digest = truncate_chars(&build_digest(&columns, rows.first()), self.max_chars);

        let table = CanonicalTable {
            columns,
            rows,
            digest,
        };

        let profile = TableProfile::of(&table);
        tracing::debug!(
            rows_in = input_rows,
            rows_kept = profile.rows,
            columns = profile.columns,
            "Table normalized"
        );

        table
    }

    fn capped_text(&self, text: &str) -> CanonicalDocument {
        let total = text.chars().count();
        if total > self.max_chars {
            tracing::debug!(chars = total, cap = self.max_chars, "Canonical text truncated");
        }
        CanonicalDocument::Text {
            text: truncate_chars(text, self.max_chars),
        }
    }
}

/// Normalize with the default 5000-character cap.
pub fn normalize(payload: RawPayload) -> CanonicalDocument {
    Canonicalizer::default().normalize(payload)
}

/// Trimmed, single-line column label.
pub fn canonical_label(raw: &str) -> String {
    raw.trim().replace("\r\n", "_").replace(['\n', '\r'], "_")
}

/// Best-effort numeric coercion of text cells. Thousands separators are ignored.
/// Anything that does not parse is returned unchanged.
pub fn coerce_cell(cell: CellValue) -> CellValue {
    let CellValue::Text(raw) = cell else {
        return cell;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    if let Ok(i) = cleaned.parse::<i64>() {
        return CellValue::Integer(i);
    }
    match cleaned.parse::<f64>() {
        Ok(x) if x.is_finite() => CellValue::Float(x),
        _ => CellValue::Text(raw),
    }
}

/// `- <Label>: <value>` per column, value from the first row.
fn build_digest(columns: &[String], first_row: Option<&Vec<CellValue>>) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let value = first_row
                .and_then(|row| row.get(index))
                .filter(|cell| !cell.is_empty())
                .map(|cell| cell.to_string())
                .unwrap_or_else(|| MISSING_VALUE.to_string());
            format!("- {}: {}", title_case(&label.replace('_', " ")), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
/// Any non-letter (space, digit, punctuation) starts a new run.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// First `max` characters of `s`. Not word-boundary aware.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_index, _)) => s[..byte_index].to_string(),
        None => s.to_string(),
    }
}
