pub mod format;
pub mod types;
pub mod tabular;
pub mod loader;

pub use format::*;
pub use types::*;
pub use loader::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size_mb:.1}MB exceeds {max_mb}MB limit")]
    FileTooLarge { size_mb: f64, max_mb: u64 },

    #[error("CSV decoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet decoding failed: {0}")]
    Spreadsheet(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("DOCX parsing failed: {0}")]
    Docx(String),

    #[error("Text encoding error: {0}")]
    Encoding(String),
}
