//! Format loader: file path in, tagged `RawPayload` out.
//!
//! `load` never fails. Unknown extensions and every I/O or decode error are
//! turned into `RawPayload::Unsupported` with a diagnostic, so the pipeline can
//! still run a best-effort text pass over a broken upload.

use std::path::Path;

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::format::SourceFormat;
use super::tabular::{read_csv, read_spreadsheet};
use super::types::RawPayload;
use super::ImportError;

const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024; // 100MB

/// Load a file into a raw payload. Errors become `Unsupported` payloads.
pub fn load(path: &Path) -> RawPayload {
    match try_load(path) {
        Ok(payload) => {
            tracing::info!(
                path = %path.display(),
                kind = payload.kind(),
                "File loaded"
            );
            payload
        }
        Err(e) => {
            let diagnostic = match &e {
                ImportError::UnsupportedFormat(_) => e.to_string(),
                _ => format!("Error loading file: {e}"),
            };
            tracing::warn!(
                path = %path.display(),
                diagnostic = %diagnostic,
                "Load failed, continuing with diagnostic payload"
            );
            RawPayload::Unsupported { diagnostic }
        }
    }
}

/// Fallible loader behind `load`. Exposed for callers that want the typed error.
pub fn try_load(path: &Path) -> Result<RawPayload, ImportError> {
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| ImportError::UnsupportedFormat(path.display().to_string()))?;

    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(ImportError::FileTooLarge {
            size_mb: size as f64 / (1024.0 * 1024.0),
            max_mb: MAX_FILE_SIZE / (1024 * 1024),
        });
    }

    tracing::debug!(path = %path.display(), format = %format, size, "Decoding file");

    match format {
        SourceFormat::Csv => read_csv(path).map(RawPayload::Tabular),
        SourceFormat::Xls | SourceFormat::Xlsx => read_spreadsheet(path).map(RawPayload::Tabular),
        SourceFormat::Json => read_json(path),
        SourceFormat::Pdf => read_pdf(path),
        SourceFormat::Docx => read_docx(path),
        SourceFormat::Txt => read_txt(path),
    }
}

/// Whole file as one JSON value; arrays and objects are both accepted.
fn read_json(path: &Path) -> Result<RawPayload, ImportError> {
    let bytes = std::fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    Ok(RawPayload::StructuredRecord { value })
}

/// Text layer of every page in order, newline-joined. Pages without text contribute "".
fn read_pdf(path: &Path) -> Result<RawPayload, ImportError> {
    let bytes = std::fs::read(path)?;

    // pdf-extract panics on some malformed inputs instead of returning Err.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .map_err(|_| ImportError::PdfParsing("PDF parser aborted on malformed input".into()))?
        .map_err(|e| ImportError::PdfParsing(e.to_string()))?;

    tracing::debug!(path = %path.display(), pages = pages.len(), "PDF text extracted");

    Ok(RawPayload::Text {
        text: pages.join("\n"),
    })
}

/// Non-empty paragraphs in document order, newline-joined.
fn read_docx(path: &Path) -> Result<RawPayload, ImportError> {
    let bytes = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| ImportError::Docx(e.to_string()))?;

    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>();

    Ok(RawPayload::Text {
        text: paragraphs.join("\n"),
    })
}

/// Runs within a paragraph are fragments of the same sentence: concatenate without separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&para.children, &mut text);
    text
}

/// Hyperlinks wrap their own runs; tabs and line breaks keep their whitespace.
fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

fn read_txt(path: &Path) -> Result<RawPayload, ImportError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|e| ImportError::Encoding(e.to_string()))?;
    let text = text.strip_prefix('\u{FEFF}').map(str::to_string).unwrap_or(text);
    Ok(RawPayload::Text { text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::import::types::CellValue;

    fn write_file(name: &str, bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        (dir, path)
    }

    /// Build a PDF with one text page per entry (`None` = page without text) using lopdf.
    fn make_test_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_text in pages {
            let content = match page_text {
                Some(text) => format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET"),
                None => String::new(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn make_test_docx(paragraphs: &[&str]) -> Vec<u8> {
        use docx_rs::{Docx, Paragraph, Run};

        let mut docx = Docx::new();
        for text in paragraphs {
            let mut para = Paragraph::new();
            if !text.is_empty() {
                para = para.add_run(Run::new().add_text(*text));
            }
            docx = docx.add_paragraph(para);
        }
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn csv_loads_as_tabular() {
        let (_dir, path) = write_file("q3.csv", b"Revenue,Cost\n1000,400\n");
        match load(&path) {
            RawPayload::Tabular(table) => {
                assert_eq!(table.columns, vec!["Revenue", "Cost"]);
                assert_eq!(table.rows[0][1], CellValue::Text("400".into()));
            }
            other => panic!("expected tabular payload, got {other:?}"),
        }
    }

    #[test]
    fn json_object_and_array_are_structured_records() {
        let (_dir, obj) = write_file("a.json", br#"{"revenue": 1000, "segments": ["retail"]}"#);
        let (_dir2, arr) = write_file("b.json", br#"[{"q": 1}, {"q": 2}]"#);

        match load(&obj) {
            RawPayload::StructuredRecord { value } => assert_eq!(value["revenue"], 1000),
            other => panic!("expected structured record, got {other:?}"),
        }
        match load(&arr) {
            RawPayload::StructuredRecord { value } => assert_eq!(value.as_array().unwrap().len(), 2),
            other => panic!("expected structured record, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_becomes_diagnostic() {
        let (_dir, path) = write_file("broken.json", b"{\"revenue\": ");
        match load(&path) {
            RawPayload::Unsupported { diagnostic } => {
                assert!(diagnostic.starts_with("Error loading file:"), "{diagnostic}");
            }
            other => panic!("expected unsupported payload, got {other:?}"),
        }
    }

    #[test]
    fn txt_is_read_verbatim() {
        let (_dir, path) = write_file("notes.txt", "  Q3 revenue up 4%\nCosts flat  ".as_bytes());
        assert_eq!(
            load(&path),
            RawPayload::Text {
                text: "  Q3 revenue up 4%\nCosts flat  ".into()
            }
        );
    }

    #[test]
    fn txt_byte_order_mark_is_stripped() {
        let (_dir, path) = write_file("bom.txt", "\u{FEFF}hello".as_bytes());
        assert_eq!(load(&path), RawPayload::Text { text: "hello".into() });
    }

    #[test]
    fn invalid_utf8_txt_becomes_diagnostic() {
        let (_dir, path) = write_file("latin1.txt", &[0x66, 0x6F, 0xFF, 0xFE]);
        match load(&path) {
            RawPayload::Unsupported { diagnostic } => assert!(diagnostic.contains("encoding")),
            other => panic!("expected unsupported payload, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_unsupported_without_reading() {
        // File does not even exist: the extension check comes first.
        let payload = load(Path::new("/nonexistent/upload.bin"));
        match payload {
            RawPayload::Unsupported { diagnostic } => {
                assert!(!diagnostic.is_empty());
                assert!(diagnostic.starts_with("Unsupported file format:"));
                assert!(diagnostic.contains("upload.bin"));
            }
            other => panic!("expected unsupported payload, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_becomes_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let payload = load(&dir.path().join("gone.csv"));
        match payload {
            RawPayload::Unsupported { diagnostic } => assert!(diagnostic.contains("I/O error")),
            other => panic!("expected unsupported payload, got {other:?}"),
        }
    }

    #[test]
    fn try_load_exposes_typed_error() {
        let err = try_load(Path::new("upload.exe")).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }

    #[test]
    fn oversized_file_becomes_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.txt");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_FILE_SIZE + 1).unwrap();
        match load(&path) {
            RawPayload::Unsupported { diagnostic } => assert!(diagnostic.contains("too large")),
            other => panic!("expected unsupported payload, got {other:?}"),
        }
    }

    #[test]
    fn pdf_pages_are_joined_in_order() {
        let bytes = make_test_pdf(&[Some("Revenue grew"), Some("Costs fell")]);
        let (_dir, path) = write_file("report.pdf", &bytes);
        match load(&path) {
            RawPayload::Text { text } => {
                let revenue = text.find("Revenue").expect("first page text");
                let costs = text.find("Costs").expect("second page text");
                assert!(revenue < costs);
            }
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[test]
    fn pdf_page_without_text_is_not_an_error() {
        let bytes = make_test_pdf(&[None, Some("Closing balance")]);
        let (_dir, path) = write_file("sparse.pdf", &bytes);
        match load(&path) {
            RawPayload::Text { text } => assert!(text.contains("Closing")),
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[test]
    fn invalid_pdf_becomes_diagnostic() {
        let (_dir, path) = write_file("fake.pdf", b"not a pdf");
        assert!(load(&path).is_unsupported());
    }

    #[test]
    fn docx_skips_empty_paragraphs() {
        let bytes = make_test_docx(&["Quarterly summary", "", "Margins improved"]);
        let (_dir, path) = write_file("memo.docx", &bytes);
        assert_eq!(
            load(&path),
            RawPayload::Text {
                text: "Quarterly summary\nMargins improved".into()
            }
        );
    }

    #[test]
    fn docx_keeps_hyperlink_text_tabs_and_breaks() {
        use docx_rs::{BreakType, Docx, Hyperlink, HyperlinkType, Paragraph, Run};

        let para = Paragraph::new()
            .add_run(Run::new().add_text("Net income").add_tab().add_text("1,200"))
            .add_run(Run::new().add_break(BreakType::TextWrapping).add_text("Source: "))
            .add_hyperlink(
                Hyperlink::new("https://example.com/filing", HyperlinkType::External)
                    .add_run(Run::new().add_text("annual filing")),
            );
        let mut cursor = std::io::Cursor::new(Vec::new());
        Docx::new().add_paragraph(para).build().pack(&mut cursor).unwrap();

        let (_dir, path) = write_file("memo.docx", &cursor.into_inner());
        assert_eq!(
            load(&path),
            RawPayload::Text {
                text: "Net income\t1,200\nSource: annual filing".into()
            }
        );
    }

    #[test]
    fn xlsx_loads_first_sheet_and_digests_first_row() {
        use crate::pipeline::canonical::{CanonicalDocument, Canonicalizer};
        use rust_xlsxwriter::Workbook;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figures.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, " Revenue ").unwrap();
        sheet.write_string(0, 1, "Cost").unwrap();
        sheet.write_number(1, 0, 1000.0).unwrap();
        sheet.write_number(1, 1, 400.0).unwrap();
        sheet.write_number(2, 0, 1100.0).unwrap();
        let notes = workbook.add_worksheet();
        notes.write_string(0, 0, "Draft").unwrap();
        workbook.save(&path).unwrap();

        let payload = load(&path);
        match &payload {
            RawPayload::Tabular(table) => {
                assert_eq!(table.columns, vec![" Revenue ", "Cost"]);
                assert_eq!(table.rows.len(), 2);
                assert_eq!(table.rows[1], vec![CellValue::Float(1100.0), CellValue::Empty]);
            }
            other => panic!("expected tabular payload, got {other:?}"),
        }

        match Canonicalizer::default().normalize(payload) {
            CanonicalDocument::Table(table) => {
                assert_eq!(table.columns, vec!["Revenue", "Cost"]);
                assert_eq!(table.digest, "- Revenue: 1000\n- Cost: 400");
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn invalid_docx_becomes_diagnostic() {
        let (_dir, path) = write_file("memo.docx", b"PK but not really");
        assert!(load(&path).is_unsupported());
    }
}
