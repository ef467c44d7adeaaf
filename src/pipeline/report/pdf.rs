use std::io::{BufWriter, Write};
use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::layout::{LineStyle, ReportLayout};
use super::RenderError;
use crate::pipeline_config::LayoutConfig;

/// Serialize a laid-out report to PDF bytes.
///
/// Body lines use Courier so the fixed character budget maps onto a fixed
/// physical width.
pub fn encode_pdf(
    layout: &ReportLayout,
    config: &LayoutConfig,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    let width = Mm(config.page_width_mm);
    let height = Mm(config.page_height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?;
    let courier = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?;

    for (index, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let (font, size) = match line.style {
                LineStyle::Title => (&bold, config.title_font_size),
                LineStyle::SectionHeader => (&bold, config.header_font_size),
                LineStyle::Continuation => (&regular, config.header_font_size),
                LineStyle::CoverMeta => (&regular, config.body_font_size + 3.0),
                LineStyle::Body => (&courier, config.body_font_size),
                LineStyle::Footer => (&regular, config.footer_font_size),
            };
            layer.use_text(printable(&line.text), size, Mm(line.x_mm), Mm(line.y_mm), font);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| RenderError::Pdf(format!("buffer error: {e}")))
}

/// Write bytes to `output` via a sibling temp file and rename, so a failed
/// write never leaves a partial document behind.
pub fn write_atomically(output: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let io_err = |source: std::io::Error| RenderError::Io {
        path: output.to_path_buf(),
        source,
    };

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".finsight-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(output).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Replace characters the builtin fonts cannot encode with `?`.
///
/// Builtin fonts are written with WinAnsiEncoding: ASCII, Latin-1 from
/// U+00A0, and the 0x80..0x9F slots listed in `WIN_ANSI_EXTRAS`.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if is_win_ansi(c) { c } else { '?' })
        .collect()
}

const WIN_ANSI_EXTRAS: [char; 27] = [
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

fn is_win_ansi(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF) || WIN_ANSI_EXTRAS.contains(&c)
}
