//! # docoutline
//!
//! Document outline extraction for Rust.
//!
//! Extracts a title and a hierarchical list of headings (level, text, page)
//! from PDF documents, using font sizes, and from Markdown, using `#`
//! heading syntax.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docoutline::{extract_file, render};
//!
//! fn main() -> docoutline::Result<()> {
//!     let doc = extract_file("report.pdf")?;
//!
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Font-size classification**: the largest text is the title, sizes
//!   above fixed thresholds become H1-H3
//! - **Markdown headings**: H1-H6 with inline formatting stripped and
//!   page cues such as `[L3-4]` or `page 7`
//! - **Page estimation**: explicit cues or line-position estimates
//! - **Parallel processing**: Uses Rayon for multi-page documents and batches
//! - **Schema validation**: report every problem in an outline JSON

pub mod assemble;
pub mod classify;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod validate;

// Re-export commonly used types
pub use classify::{
    FontSizeClassifier, FontThresholds, HeadingClassifier, MarkdownClassifier, PageMode,
};
pub use convert::{
    BlocksExtractor, ExtractorRegistry, MarkdownExtractor, OutlineOptions, PdfExtractor,
    SourceExtractor,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat, SourceKind};
pub use error::{Error, Result};
pub use model::{HeadingLevel, OutlineDocument, OutlineEntry, TextUnit};
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfReader};
pub use render::JsonFormat;
pub use validate::{validate_json, validate_value, ValidationReport};

use std::path::Path;

/// Extract the outline of a file, choosing the extractor by extension.
///
/// # Example
///
/// ```no_run
/// use docoutline::extract_file;
///
/// let doc = extract_file("report.pdf").unwrap();
/// println!("{} headings", doc.outline.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    ExtractorRegistry::with_defaults().extract(path.as_ref(), &OutlineOptions::default())
}

/// Extract the outline of Markdown content.
///
/// Pages come from explicit cues only; if no heading is found the content
/// is parsed again with estimated pages.
///
/// # Example
///
/// ```
/// use docoutline::extract_markdown;
///
/// let doc = extract_markdown("# Title\n## Sub\n")?;
/// assert_eq!(doc.title, "Title");
/// assert_eq!(doc.outline[1].text, "Sub");
/// # Ok::<(), docoutline::Error>(())
/// ```
pub fn extract_markdown(content: &str) -> Result<OutlineDocument> {
    MarkdownExtractor::new().parse(content, &OutlineOptions::default())
}

/// Extract the outline of a UTF-8 Markdown file.
pub fn extract_markdown_file<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    MarkdownExtractor::new().extract(path.as_ref(), &OutlineOptions::default())
}

/// Extract the outline of a PDF file.
pub fn extract_pdf_file<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    PdfExtractor::new().extract(path.as_ref(), &OutlineOptions::default())
}

/// Extract the outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use docoutline::extract_pdf_bytes;
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let doc = extract_pdf_bytes(&data).unwrap();
/// ```
pub fn extract_pdf_bytes(data: &[u8]) -> Result<OutlineDocument> {
    PdfExtractor::new().extract_bytes(data, &OutlineOptions::default())
}

/// Classify serialized text units (`[{"text", "size", "page"}]`) by font size.
///
/// # Example
///
/// ```
/// use docoutline::extract_blocks_json;
///
/// let doc = extract_blocks_json(r#"[
///     {"text": "Report", "size": 24, "page": 1},
///     {"text": "Scope", "size": 20, "page": 1},
///     {"text": "body", "size": 10, "page": 1}
/// ]"#)?;
/// assert_eq!(doc.title, "Report");
/// assert_eq!(doc.outline[0].text, "Scope");
/// # Ok::<(), docoutline::Error>(())
/// ```
pub fn extract_blocks_json(json: &str) -> Result<OutlineDocument> {
    BlocksExtractor::new().extract_bytes(json.as_bytes(), &OutlineOptions::default())
}

/// Read the text units of a PDF file, one per visual line.
pub fn read_pdf_units<P: AsRef<Path>>(path: P) -> Result<Vec<TextUnit>> {
    PdfReader::open(path)?.read_units()
}

/// Builder for outline extraction with custom options.
///
/// # Example
///
/// ```no_run
/// use docoutline::{Outliner, PageMode};
///
/// let doc = Outliner::new()
///     .with_mode(PageMode::Estimated)
///     .with_lines_per_page(40)
///     .lenient()
///     .extract("notes.md")?;
/// # Ok::<(), docoutline::Error>(())
/// ```
pub struct Outliner {
    options: OutlineOptions,
    registry: ExtractorRegistry,
}

impl Outliner {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: OutlineOptions::default(),
            registry: ExtractorRegistry::with_defaults(),
        }
    }

    /// Set the Markdown page mode.
    pub fn with_mode(mut self, mode: PageMode) -> Self {
        self.options = self.options.with_mode(mode);
        self
    }

    /// Set lines per page for page estimation.
    pub fn with_lines_per_page(mut self, lines_per_page: u32) -> Self {
        self.options = self.options.with_lines_per_page(lines_per_page);
        self
    }

    /// Do not retry Markdown in the alternate page mode.
    pub fn without_fallback(mut self) -> Self {
        self.options = self.options.with_fallback(false);
        self
    }

    /// Set the Markdown text encoding label.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.options = self.options.with_encoding(encoding);
        self
    }

    /// Set font-size thresholds.
    pub fn with_thresholds(mut self, thresholds: FontThresholds) -> Self {
        self.options = self.options.with_thresholds(thresholds);
        self
    }

    /// Skip PDF pages that fail to decode.
    pub fn lenient(mut self) -> Self {
        self.options.parse = self.options.parse.lenient();
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.options.parse = self.options.parse.sequential();
        self
    }

    /// Set PDF page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options.parse = self.options.parse.with_pages(pages);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of a file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<OutlineDocument> {
        self.registry.extract(path.as_ref(), &self.options)
    }

    /// Extract from bytes, choosing the format by extension.
    pub fn extract_bytes(&self, data: &[u8], ext: &str) -> Result<OutlineDocument> {
        self.registry.extract_bytes(data, ext, &self.options)
    }

    /// Extract the outline of Markdown content.
    pub fn extract_markdown(&self, content: &str) -> Result<OutlineDocument> {
        self.options.validate()?;
        MarkdownExtractor::new().parse(content, &self.options)
    }
}

impl Default for Outliner {
    fn default() -> Self {
        Self::new()
    }
}
