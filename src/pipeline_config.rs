//! Pipeline and layout configuration.
//!
//! Both values are built once (from defaults or CLI overrides) and handed to
//! `PipelineRunner::new` / `ReportCompositor::new`. They are read-only for the
//! rest of the run.

use std::path::PathBuf;

use serde::Serialize;

// ═══════════════════════════════════════════════════════════
// Pipeline
// ═══════════════════════════════════════════════════════════

/// Hard cap on canonical text handed to the first stage (characters).
pub const DEFAULT_MAX_TEXT_CHARS: usize = 5000;

/// Cap on each prior-stage entry interpolated into a later prompt (characters).
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 8000;

pub const DEFAULT_REPORT_TITLE: &str = "Consolidated Financial Report";

pub const DEFAULT_CONCLUSION: &str = "Overall, the company's financial health is stable. \
Following the recommendations above will help manage risk and optimize strategic growth.";

#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Truncation length for canonical text and digests.
    pub max_text_chars: usize,
    /// Truncation length for each prior-stage output inside a prompt.
    pub max_context_chars: usize,
    /// When set, stage prompts/outputs are dumped under this directory.
    pub dump_dir: Option<PathBuf>,
    /// Cover page title.
    pub report_title: String,
    /// Fixed closing text for the `Conclusion` section.
    pub conclusion: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            dump_dir: None,
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            conclusion: DEFAULT_CONCLUSION.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Layout
// ═══════════════════════════════════════════════════════════

/// Page geometry for the report compositor. All lengths in millimetres, A4 by default.
///
/// The page is split into three bands:
/// - header band: between the page top and `top_margin_mm` (section header / continuation banner)
/// - body region: from `top_margin_mm` down to `bottom_margin_mm`
/// - footer band: below `bottom_margin_mm` (page numbers)
#[derive(Debug, Clone, Serialize)]
pub struct LayoutConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub top_margin_mm: f32,
    pub bottom_margin_mm: f32,
    pub left_margin_mm: f32,
    pub body_indent_mm: f32,
    pub line_height_mm: f32,
    /// Fixed character budget per body line, independent of font metrics.
    pub column_width: usize,
    pub title_font_size: f32,
    pub header_font_size: f32,
    pub body_font_size: f32,
    pub footer_font_size: f32,
    /// Provenance line printed on the cover page.
    pub provenance: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            top_margin_mm: 40.0,
            bottom_margin_mm: 20.0,
            left_margin_mm: 20.0,
            body_indent_mm: 2.0,
            line_height_mm: 5.0,
            column_width: 120,
            title_font_size: 20.0,
            header_font_size: 14.0,
            body_font_size: 7.0,
            footer_font_size: 7.0,
            provenance: "Prepared by: Finsight Multi-Stage Financial Analysis Pipeline".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Baseline of the first body line on every page.
    pub fn body_top_mm(&self) -> f32 {
        self.page_height_mm - self.top_margin_mm
    }

    /// Number of body lines that fit between the body top and the bottom margin.
    ///
    /// Lines sit at `body_top - k * line_height` for `k = 0..capacity`; the last one
    /// is the lowest baseline still at or above the bottom margin.
    pub fn lines_per_page(&self) -> usize {
        let span = self.body_top_mm() - self.bottom_margin_mm;
        if span < 0.0 || self.line_height_mm <= 0.0 {
            return 1;
        }
        // Epsilon absorbs f32 noise on exact multiples.
        ((span / self.line_height_mm) + 1e-3).floor() as usize + 1
    }

    /// Baseline of the header band line (section header / continuation banner).
    pub fn header_y_mm(&self) -> f32 {
        self.page_height_mm - self.top_margin_mm / 2.0
    }

    /// Baseline of the footer line.
    pub fn footer_y_mm(&self) -> f32 {
        self.bottom_margin_mm / 2.0
    }

    /// Characters of Helvetica at `font_size` pt that fit between the side margins.
    ///
    /// Assumes 0.6 em per glyph, above the face's mixed-case average, so a
    /// line at this budget stays inside the page.
    pub fn heading_chars(&self, font_size: f32) -> usize {
        let usable_mm = self.page_width_mm - 2.0 * self.left_margin_mm;
        let glyph_mm = font_size * PT_TO_MM * 0.6;
        if usable_mm <= 0.0 || glyph_mm <= 0.0 {
            return 1;
        }
        ((usable_mm / glyph_mm).floor() as usize).max(1)
    }

    /// Baseline distance between wrapped cover title lines.
    pub fn title_line_step_mm(&self) -> f32 {
        self.title_font_size * PT_TO_MM * 1.25
    }
}

const PT_TO_MM: f32 = 25.4 / 72.0;
