//! Row/column decoding for csv, xls and xlsx sources.
//!
//! The first row is the header. No validation or coercion happens here.
//! CSV cells stay raw text; spreadsheet cells keep their native types, except
//! dates, which become calendar text.

use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};

use super::types::{CellValue, TabularPayload};
use super::ImportError;

pub fn read_csv(path: &Path) -> Result<TabularPayload, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let columns = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| header_label(i, h))
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::from_raw).collect());
    }

    tracing::debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        "CSV decoded"
    );

    Ok(TabularPayload::new(columns, rows))
}

/// Decode the first worksheet of an xls/xlsx workbook.
pub fn read_spreadsheet(path: &Path) -> Result<TabularPayload, ImportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Spreadsheet("workbook has no worksheets".into()))?
        .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let columns = match sheet_rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| header_label(i, &cell.to_string()))
            .collect::<Vec<_>>(),
        None => Vec::new(),
    };

    let rows = sheet_rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect::<Vec<_>>();

    tracing::debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        "Worksheet decoded"
    );

    Ok(TabularPayload::new(columns, rows))
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(x) => CellValue::Float(*x),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::from_raw(s),
        Data::DateTime(dt) => CellValue::Text(excel_datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Date cells render as `YYYY-MM-DD HH:MM:SS`, durations as `H:MM:SS`.
/// Serials outside chrono's range fall back to the raw number.
fn excel_datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(d) = dt.as_duration() {
            let secs = d.num_seconds();
            return format!("{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60);
        }
    } else if let Some(ndt) = dt.as_datetime() {
        return ndt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    dt.to_string()
}

/// Blank header cells get a positional placeholder so every column has a label.
fn header_label(index: usize, raw: &str) -> String {
    if raw.trim().is_empty() {
        format!("Unnamed: {index}")
    } else {
        raw.to_string()
    }
}
