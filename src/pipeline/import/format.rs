use std::path::Path;

use serde::{Deserialize, Serialize};

/// Source formats we know how to decode.
///
/// Detection is by extension only, case-sensitive: `report.CSV` is unsupported.
/// There is no content sniffing fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Csv,
    Xls,
    Xlsx,
    Json,
    Pdf,
    Docx,
    Txt,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 7] = [
        Self::Csv,
        Self::Xls,
        Self::Xlsx,
        Self::Json,
        Self::Pdf,
        Self::Docx,
        Self::Txt,
    ];

    /// Map a path's extension to a format, or `None` if unrecognized.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|f| f.extension() == extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    /// Rows-and-columns sources.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::Csv | Self::Xls | Self::Xlsx)
    }

    /// Sources decoded to free text.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Pdf | Self::Docx | Self::Txt)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
