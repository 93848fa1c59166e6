//! Raw text units produced by the extractors.

use serde::{Deserialize, Serialize};

/// One unit of source text with its page and style metadata.
///
/// PDF units carry `font_size` (and usually `font_name`); Markdown units
/// carry `raw_line` and `line`. The serialized form uses the short keys
/// `size` and `font`, so extractor dumps such as
/// `{"text": "Intro", "size": 16.0, "page": 1}` read back directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnit {
    /// Text content (trimmed)
    pub text: String,
    /// 1-based page number
    pub page: u32,
    /// Font size in points (PDF)
    #[serde(rename = "size", default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Font name (PDF), not used for classification
    #[serde(rename = "font", default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// Untrimmed source line (Markdown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_line: Option<String>,
    /// 1-based source line number (Markdown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl TextUnit {
    /// A PDF text unit.
    pub fn span(text: impl Into<String>, font_size: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            page,
            font_size: Some(font_size),
            font_name: None,
            raw_line: None,
            line: None,
        }
    }

    /// Set the font name.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    /// A Markdown line unit. `text` is the trimmed line.
    pub fn markdown_line(raw_line: &str, line: u32) -> Self {
        Self {
            text: raw_line.trim().to_string(),
            page: 1,
            font_size: None,
            font_name: None,
            raw_line: Some(raw_line.to_string()),
            line: Some(line),
        }
    }
}

/// Split Markdown content into line units.
///
/// Line numbers count every line, blank ones included; blank lines
/// themselves produce no unit. The unit page is left at 1 since page
/// resolution belongs to the Markdown classifier.
pub fn markdown_units(content: &str) -> Vec<TextUnit> {
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| TextUnit::markdown_line(line, i as u32 + 1))
        .collect()
}
