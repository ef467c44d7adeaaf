use indexmap::IndexMap;
use serde::Serialize;

pub const EXECUTIVE_SUMMARY: &str = "Executive Summary";
pub const KEY_INDICATORS: &str = "Key Financial Indicators";
pub const RISK_ANALYSIS: &str = "Risk Analysis";
pub const RECOMMENDATIONS: &str = "Strategic Recommendations";
pub const CONCLUSION: &str = "Conclusion";

/// Report section titles, in rendering order.
pub const SECTION_TITLES: [&str; 5] = [
    EXECUTIVE_SUMMARY,
    KEY_INDICATORS,
    RISK_ANALYSIS,
    RECOMMENDATIONS,
    CONCLUSION,
];

/// Body of one report section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    /// Rendered as an indented outline.
    Structured(serde_json::Value),
}

impl From<String> for SectionContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for SectionContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Ordered section title to content mapping. Insertion order is render order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SectionMap {
    sections: IndexMap<String, SectionContent>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section. Re-inserting an existing title replaces its content
    /// in place.
    pub fn insert(&mut self, title: impl Into<String>, content: impl Into<SectionContent>) {
        self.sections.insert(title.into(), content.into());
    }

    pub fn with(mut self, title: impl Into<String>, content: impl Into<SectionContent>) -> Self {
        self.insert(title, content);
        self
    }

    pub fn get(&self, title: &str) -> Option<&SectionContent> {
        self.sections.get(title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionContent)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
