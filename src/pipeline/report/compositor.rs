use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::layout::{compose_layout, ReportLayout, TIMESTAMP_FORMAT};
use super::pdf::{encode_pdf, write_atomically};
use super::RenderError;
use crate::pipeline::analysis::SectionMap;
use crate::pipeline_config::LayoutConfig;

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: usize,
}

/// Turns a section map into a paginated PDF.
pub struct ReportCompositor {
    layout: LayoutConfig,
    /// Frozen cover timestamp; `None` uses the wall clock.
    generated_at: Option<DateTime<Local>>,
}

impl ReportCompositor {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            generated_at: None,
        }
    }

    pub fn with_timestamp(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Page and line structure without touching the filesystem.
    pub fn compose(&self, sections: &SectionMap, title: &str) -> ReportLayout {
        let generated_at = self.generated_at.unwrap_or_else(Local::now);
        let stamp = generated_at.format(TIMESTAMP_FORMAT).to_string();
        compose_layout(sections, title, &stamp, &self.layout)
    }

    /// Lay out, encode and write the report. The output file appears only
    /// once fully written.
    pub fn render(
        &self,
        sections: &SectionMap,
        title: &str,
        output_path: &Path,
    ) -> Result<RenderSummary, RenderError> {
        let _span = tracing::info_span!("render_report", output = %output_path.display()).entered();

        let layout = self.compose(sections, title);
        let bytes = encode_pdf(&layout, &self.layout, title)?;
        write_atomically(output_path, &bytes)?;

        tracing::info!(
            pages = layout.page_count(),
            bytes = bytes.len(),
            "Report written"
        );

        Ok(RenderSummary {
            path: output_path.to_path_buf(),
            pages: layout.page_count(),
            bytes: bytes.len(),
        })
    }
}

impl Default for ReportCompositor {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::SECTION_TITLES;
    use chrono::TimeZone;

    fn frozen() -> ReportCompositor {
        let at = Local.with_ymd_and_hms(2026, 10, 19, 15, 4, 0).unwrap();
        ReportCompositor::default().with_timestamp(at)
    }

    fn report_sections() -> SectionMap {
        SECTION_TITLES
            .iter()
            .fold(SectionMap::new(), |map, title| map.with(*title, format!("{title} body")))
    }

    #[test]
    fn frozen_timestamp_on_cover() {
        let layout = frozen().compose(&report_sections(), "Report");
        let texts: Vec<&str> = layout.pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert!(texts.contains(&"Generated on: 19 October 2026, 03:04 PM"));
    }

    #[test]
    fn render_writes_cover_plus_five_pages() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("report.pdf");

        let summary = frozen().render(&report_sections(), "Report", &out).unwrap();

        assert_eq!(summary.pages, 6);
        assert_eq!(summary.path, out);
        let doc = lopdf::Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 6);
    }

    #[test]
    fn rendered_text_is_extractable() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("report.pdf");
        frozen().render(&report_sections(), "Quarterly Review", &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        assert!(text.contains("Quarterly Review"));
        assert!(text.contains("Risk Analysis body"));
    }

    #[test]
    fn unwritable_destination_is_a_render_error() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("missing").join("report.pdf");
        let err = frozen().render(&report_sections(), "Report", &out).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn same_input_same_layout() {
        let compositor = frozen();
        assert_eq!(
            compositor.compose(&report_sections(), "R"),
            compositor.compose(&report_sections(), "R")
        );
    }
}
