//! Pure page layout: section map in, positioned lines out.
//!
//! Each page has three bands. The header band holds the section header
//! (or a continuation banner on overflow pages), the body region holds
//! wrapped text lines, and the footer band holds the page number. Because
//! headers never consume body lines, every page holds exactly
//! `LayoutConfig::lines_per_page()` body lines.

use serde::Serialize;

use super::outline::outline;
use crate::pipeline::analysis::{SectionContent, SectionMap};
use crate::pipeline_config::LayoutConfig;

const CONTINUED_SUFFIX: &str = " (continued)";

/// Format of the cover page timestamp, e.g. `19 October 2026, 03:04 PM`.
pub const TIMESTAMP_FORMAT: &str = "%d %B %Y, %I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Title,
    CoverMeta,
    SectionHeader,
    Continuation,
    Body,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutLine {
    pub text: String,
    pub style: LineStyle,
    pub x_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageKind {
    Cover,
    Section { title: String, continued: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPage {
    pub number: usize,
    pub kind: PageKind,
    pub lines: Vec<LayoutLine>,
}

impl LayoutPage {
    pub fn body_lines(&self) -> impl Iterator<Item = &LayoutLine> {
        self.lines.iter().filter(|l| l.style == LineStyle::Body)
    }

    pub fn lines_with_style(&self, style: LineStyle) -> impl Iterator<Item = &LayoutLine> {
        self.lines.iter().filter(move |l| l.style == style)
    }
}

/// Fully positioned report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLayout {
    pub pages: Vec<LayoutPage>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Body text of one section, across all its pages, in order.
    pub fn section_body(&self, title: &str) -> Vec<&str> {
        self.pages
            .iter()
            .filter(|p| matches!(&p.kind, PageKind::Section { title: t, .. } if t == title))
            .flat_map(|p| p.body_lines().map(|l| l.text.as_str()))
            .collect()
    }

    /// Section title of each page that starts a section.
    pub fn section_starts(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter_map(|p| match &p.kind {
                PageKind::Section { title, continued: false } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Split on newlines, then hard-wrap every line at `width` characters.
///
/// Blank lines are kept. Tabs expand to four spaces. Trailing newlines of
/// the whole body are dropped.
pub fn wrap_body(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw in text.trim_end_matches(['\n', '\r']).split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw).replace('\t', "    ");
        if line.is_empty() {
            out.push(String::new());
            continue;
        }
        let chars: Vec<char> = line.chars().collect();
        out.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }

    out
}

/// Greedy word wrap for proportional headings. Words longer than `width`
/// are split at the character budget.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if line_len > 0 {
                out.push(std::mem::take(&mut line));
                line_len = 0;
            }
            out.push(chars.drain(..width).collect());
        }
        if chars.is_empty() {
            continue;
        }
        if line_len > 0 && line_len + 1 + chars.len() > width {
            out.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line_len += chars.len();
        line.extend(chars);
    }
    if line_len > 0 || out.is_empty() {
        out.push(line);
    }
    out
}

/// Cut `text` to `max` characters, marking the cut with `...`.
pub fn fit_heading(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let head: String = text.chars().take(keep).collect();
    format!("{}...", head.trim_end())
}

/// Body text of a section, with structured content flattened to an outline.
pub fn section_text(content: &SectionContent) -> String {
    match content {
        SectionContent::Text(text) => text.clone(),
        SectionContent::Structured(value) => outline(value),
    }
}

/// Tracks the write position while pages are filled.
pub struct LayoutCursor<'a> {
    config: &'a LayoutConfig,
    capacity: usize,
    pages: Vec<LayoutPage>,
    current: LayoutPage,
    /// Body lines already placed on the current page.
    line: usize,
}

impl<'a> LayoutCursor<'a> {
    /// Start on the cover page.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            capacity: config.lines_per_page(),
            pages: Vec::new(),
            current: LayoutPage {
                number: 1,
                kind: PageKind::Cover,
                lines: Vec::new(),
            },
            line: 0,
        }
    }

    /// Title wrapped to the page width, then the timestamp and provenance
    /// below its last line.
    pub fn place_cover(&mut self, title: &str, generated_on: &str) {
        let x = self.config.left_margin_mm;
        let step = self.config.title_line_step_mm();
        let mut y = self.config.page_height_mm * 0.6;
        let budget = self.config.heading_chars(self.config.title_font_size);
        for (i, line) in wrap_words(title, budget).iter().enumerate() {
            if i > 0 {
                y -= step;
            }
            self.push(line, LineStyle::Title, x, y);
        }
        self.push(
            &format!("Generated on: {generated_on}"),
            LineStyle::CoverMeta,
            x,
            y - 12.0,
        );
        let provenance = self.config.provenance.clone();
        self.push(&provenance, LineStyle::CoverMeta, x, y - 18.0);
    }

    /// Unconditional break, then the section header in the header band.
    /// Headers wider than the page are cut so the band stays one line.
    pub fn begin_section(&mut self, title: &str) {
        self.break_page(PageKind::Section {
            title: title.to_string(),
            continued: false,
        });
        let y = self.config.header_y_mm();
        let header = fit_heading(title, self.header_budget());
        self.push(&header, LineStyle::SectionHeader, self.config.left_margin_mm, y);
    }

    /// Place one body line, breaking first if the page is full.
    pub fn emit_body_line(&mut self, text: &str) {
        if self.line >= self.capacity {
            self.continue_section();
        }
        let y = self.config.body_top_mm() - self.line as f32 * self.config.line_height_mm;
        let x = self.config.left_margin_mm + self.config.body_indent_mm;
        self.push(text, LineStyle::Body, x, y);
        self.line += 1;
    }

    /// Close the last page and number every page `Page N of M`.
    pub fn finish(mut self) -> ReportLayout {
        self.pages.push(self.current);
        let total = self.pages.len();
        let x = self.config.left_margin_mm;
        let y = self.config.footer_y_mm();
        for page in &mut self.pages {
            page.lines.push(LayoutLine {
                text: format!("Page {} of {total}", page.number),
                style: LineStyle::Footer,
                x_mm: x,
                y_mm: y,
            });
        }
        ReportLayout { pages: self.pages }
    }

    fn continue_section(&mut self) {
        let title = match &self.current.kind {
            PageKind::Section { title, .. } => title.clone(),
            PageKind::Cover => String::new(),
        };
        self.break_page(PageKind::Section {
            title: title.clone(),
            continued: true,
        });
        let y = self.config.header_y_mm();
        let budget = self.header_budget().saturating_sub(CONTINUED_SUFFIX.len());
        self.push(
            &format!("{}{CONTINUED_SUFFIX}", fit_heading(&title, budget)),
            LineStyle::Continuation,
            self.config.left_margin_mm,
            y,
        );
    }

    fn header_budget(&self) -> usize {
        self.config.heading_chars(self.config.header_font_size)
    }

    fn break_page(&mut self, kind: PageKind) {
        let next = LayoutPage {
            number: self.current.number + 1,
            kind,
            lines: Vec::new(),
        };
        self.pages.push(std::mem::replace(&mut self.current, next));
        self.line = 0;
    }

    fn push(&mut self, text: &str, style: LineStyle, x_mm: f32, y_mm: f32) {
        self.current.lines.push(LayoutLine {
            text: text.to_string(),
            style,
            x_mm,
            y_mm,
        });
    }
}

/// Lay out the cover plus one page-break-delimited block per section.
pub fn compose_layout(
    sections: &SectionMap,
    title: &str,
    generated_on: &str,
    config: &LayoutConfig,
) -> ReportLayout {
    let mut cursor = LayoutCursor::new(config);
    cursor.place_cover(title, generated_on);

    for (section_title, content) in sections.iter() {
        cursor.begin_section(section_title);
        for line in wrap_body(&section_text(content), config.column_width) {
            cursor.emit_body_line(&line);
        }
    }

    cursor.finish()
}
