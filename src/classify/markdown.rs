//! Markdown header parser.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::assemble::assemble;
use crate::error::{Error, Result};
use crate::model::{markdown_units, HeadingLevel, OutlineDocument, OutlineEntry, TextUnit};

use super::page::{resolve_page, PageMode, DEFAULT_LINES_PER_PAGE};
use super::HeadingClassifier;

/// ATX heading with optional emphasis around the text and optional
/// trailing bracket annotations such as `[L3-4]` or `[draft]`.
const HEADER_PATTERN: &str =
    r"^(#{1,6})\s*\**(.*?)\**\s*(?:\[L?\d+-?\d*\])?(?:\s*\[.*?\])?\s*$";

struct InlinePatterns {
    bold: Regex,
    italic: Regex,
    code: Regex,
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(HEADER_PATTERN).expect("header pattern"))
}

fn inline_patterns() -> &'static InlinePatterns {
    static INLINE: OnceLock<InlinePatterns> = OnceLock::new();
    INLINE.get_or_init(|| InlinePatterns {
        bold: Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"),
        italic: Regex::new(r"\*(.*?)\*").expect("italic pattern"),
        code: Regex::new(r"`(.*?)`").expect("code pattern"),
    })
}

/// Remove `**bold**`, `*italic*` and `` `code` `` markup, keeping the
/// inner text. Unbalanced markers are left as they are.
pub fn strip_inline_formatting(text: &str) -> String {
    let patterns = inline_patterns();
    let text = patterns.bold.replace_all(text, "${1}");
    let text = patterns.italic.replace_all(&text, "${1}");
    let text: Cow<'_, str> = patterns.code.replace_all(&text, "${1}");
    text.into_owned()
}

/// Match a trimmed line against the heading syntax.
///
/// Returns the level and the cleaned text. Lines with seven or more
/// leading `#` are not headings.
fn parse_header(line: &str) -> Option<(HeadingLevel, String)> {
    let caps = header_regex().captures(line)?;
    let hashes = caps.get(1)?.as_str();
    if line[hashes.len()..].starts_with('#') {
        return None;
    }
    let level = HeadingLevel::from_depth(hashes.len())?;
    let text = strip_inline_formatting(caps.get(2)?.as_str().trim());
    Some((level, text.trim().to_string()))
}

/// Per-call parse state.
struct ParseState {
    title: Option<String>,
    outline: Vec<OutlineEntry>,
    current_page: u32,
}

impl ParseState {
    fn new() -> Self {
        Self {
            title: None,
            outline: Vec::new(),
            current_page: 1,
        }
    }

    fn push(&mut self, level: HeadingLevel, text: String, page: u32) {
        if self.title.is_none() && level.is_title_candidate() {
            self.title = Some(text.clone());
        }
        self.outline.push(OutlineEntry::new(level, text, page));
    }

    fn finish(self) -> OutlineDocument {
        assemble(self.title, self.outline)
    }
}

/// Classifies Markdown lines by their `#` heading syntax.
///
/// The heading level is the number of leading `#` (H1-H6). The title is
/// the first H1 or H2 heading. Page numbers follow the configured
/// [`PageMode`].
///
/// # Example
///
/// ```
/// use docoutline::classify::{MarkdownClassifier, PageMode};
///
/// let doc = MarkdownClassifier::new(PageMode::Strict).parse("# Title\n## Sub\n")?;
/// assert_eq!(doc.title, "Title");
/// assert_eq!(doc.outline.len(), 2);
/// # Ok::<(), docoutline::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownClassifier {
    mode: PageMode,
    lines_per_page: u32,
}

impl MarkdownClassifier {
    /// Create a classifier for the given page mode with 50 lines per page.
    pub fn new(mode: PageMode) -> Self {
        Self {
            mode,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
        }
    }

    /// Set the lines-per-page density used for page estimation.
    pub fn with_lines_per_page(mut self, lines_per_page: u32) -> Self {
        self.lines_per_page = lines_per_page;
        self
    }

    /// The page mode.
    pub fn mode(&self) -> PageMode {
        self.mode
    }

    /// The lines-per-page density.
    pub fn lines_per_page(&self) -> u32 {
        self.lines_per_page
    }

    /// The same classifier in the alternate page mode.
    pub fn alternate(&self) -> Self {
        Self {
            mode: self.mode.alternate(),
            ..*self
        }
    }

    /// Parse Markdown content.
    pub fn parse(&self, content: &str) -> Result<OutlineDocument> {
        self.classify(&markdown_units(content))
    }
}

impl Default for MarkdownClassifier {
    fn default() -> Self {
        Self::new(PageMode::default())
    }
}

impl HeadingClassifier for MarkdownClassifier {
    fn name(&self) -> &str {
        "markdown"
    }

    fn classify(&self, units: &[TextUnit]) -> Result<OutlineDocument> {
        if self.lines_per_page == 0 {
            return Err(Error::InvalidLinesPerPage);
        }

        let mut state = ParseState::new();

        for (index, unit) in units.iter().enumerate() {
            let line = unit.text.trim();
            if line.is_empty() {
                continue;
            }
            let line_number = unit.line.ok_or(Error::MalformedUnit {
                index,
                field: "line",
            })?;

            let Some((level, text)) = parse_header(line) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }

            let (page, current_page) = resolve_page(
                self.mode,
                line,
                line_number,
                self.lines_per_page,
                state.current_page,
            );
            state.current_page = current_page;
            state.push(level, text, page);
        }

        log::debug!(
            "markdown classifier ({:?}): {} units, {} headings",
            self.mode,
            units.len(),
            state.outline.len()
        );

        Ok(state.finish())
    }
}
