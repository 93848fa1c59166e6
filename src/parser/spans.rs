//! Text spans from PDF content streams, grouped into lines.
//!
//! The walker follows the text state operators of a content stream
//! (`BT`/`ET`, `Tf`, `Td`/`TD`, `Tm`, `T*`, `TL`, `Tj`/`TJ`/`'`/`"`) and
//! records each shown string with its position and effective font size.
//! Spans sharing a baseline are then joined into lines, which become the
//! text units fed to the font-size classifier.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::TextUnit;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// TJ adjustments (thousandths of text space) above this read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A shown string with position and font information.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Base font name (e.g. "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a span; the width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }
}

/// Spans on one baseline, left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Build a line, ordering its spans by X.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        Self { spans }
    }

    /// Joined text. A space goes between spans separated by a visible gap,
    /// except between characters of scripts written without spaces.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - (prev.x + prev.width);
                let threshold = span.font_size * 0.1;

                let prev_cjk = prev.text.chars().last().is_some_and(is_spaceless_script_char);
                let curr_cjk = span.text.chars().next().is_some_and(is_spaceless_script_char);
                let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                    || span.text.starts_with([' ', '\u{00A0}']);

                if gap > threshold && !(prev_cjk && curr_cjk) && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }

    /// Convert to a text unit, taking font size and name from the first
    /// span. Returns `None` for lines without visible text.
    pub fn into_unit(self, page: u32) -> Option<TextUnit> {
        let text = self.text();
        let text = text.trim();
        let first = self.spans.first()?;
        if text.is_empty() {
            return None;
        }
        Some(TextUnit::span(text, first.font_size, page).with_font(first.font_name.clone()))
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, op: &ContentOp) {
        self.a = op.number(0, 1.0);
        self.b = op.number(1, 0.0);
        self.c = op.number(2, 0.0);
        self.d = op.number(3, 1.0);
        self.e = op.number(4, 0.0);
        self.f = op.number(5, 0.0);
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, font_size: f32) {
        let leading = if self.leading > 0.0 {
            self.leading
        } else {
            font_size * 1.2
        };
        self.translate(0.0, -leading);
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Collect the text spans of one page.
pub fn collect_page_spans<B: PdfBackend + ?Sized>(
    backend: &B,
    page: PageId,
    operations: &[ContentOp],
    fonts: &BTreeMap<Vec<u8>, String>,
) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut font_key: Vec<u8> = Vec::new();
    let mut font_name = String::new();
    let mut font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut leading: f32 = 0.0;
    let mut in_text = false;

    let decode = |key: &[u8], bytes: &[u8]| backend.decode_text(page, key, bytes);

    for op in operations {
        let shown = match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix = TextMatrix {
                    leading,
                    ..TextMatrix::default()
                };
                None
            }
            "ET" => {
                in_text = false;
                None
            }
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    font_key = name.clone();
                    font_name = fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                }
                font_size = op.number(1, 12.0);
                None
            }
            "TL" => {
                leading = op.number(0, 0.0);
                matrix.leading = leading;
                None
            }
            "Td" => {
                matrix.translate(op.number(0, 0.0), op.number(1, 0.0));
                None
            }
            "TD" => {
                let ty = op.number(1, 0.0);
                leading = -ty;
                matrix.leading = leading;
                matrix.translate(op.number(0, 0.0), ty);
                None
            }
            "Tm" => {
                matrix.set(op);
                None
            }
            "T*" => {
                matrix.next_line(font_size);
                None
            }
            "Tj" => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => Some(decode(font_key.as_slice(), bytes)),
                _ => None,
            },
            "TJ" => match op.operands.first() {
                Some(PdfValue::Array(items)) => Some(decode_tj_array(items, font_key.as_slice(), &decode)),
                _ => None,
            },
            "'" | "\"" => {
                matrix.next_line(font_size);
                let index = if op.operator == "\"" { 2 } else { 0 };
                match op.operands.get(index) {
                    Some(PdfValue::Str(bytes)) => Some(decode(font_key.as_slice(), bytes)),
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some(text) = shown {
            if in_text && !text.trim().is_empty() {
                spans.push(TextSpan::new(
                    text,
                    matrix.e,
                    matrix.f,
                    font_size * matrix.scale(),
                    font_name.clone(),
                ));
            }
        }
    }

    spans
}

/// Decode a `TJ` array; large negative adjustments become word spaces.
fn decode_tj_array<F>(items: &[PdfValue], font_key: &[u8], decode: &F) -> String
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut combined = String::new();
    for item in items {
        match item {
            PdfValue::Str(bytes) => combined.push_str(&decode(font_key, bytes)),
            other => {
                let Some(adjustment) = other.as_number().map(|n| -n) else {
                    continue;
                };
                let ends_with_space = combined.ends_with([' ', '\u{00A0}']);
                let last_spaceless = combined.chars().last().is_some_and(is_spaceless_script_char);
                if adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !ends_with_space
                    && !last_spaceless
                {
                    combined.push(' ');
                }
            }
        }
    }
    combined
}

/// Group spans into lines, top to bottom.
///
/// PDF Y grows upward, so spans are ordered by descending baseline. A span
/// within 30% of its font size of the current baseline joins that line.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| match b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal),
        other => other,
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Whether a character belongs to a script written without word spaces
/// (Han, Hiragana, Katakana, CJK punctuation). Hangul uses spaces.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
            | 0x3400..=0x4DBF
            | 0x20000..=0x2EBEF
            | 0x3040..=0x309F
            | 0x30A0..=0x30FF
            | 0x3000..=0x303F
    )
}
