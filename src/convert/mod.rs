//! Outline extraction pipeline with a pluggable extractor per input format.
//!
//! Each [`SourceExtractor`] turns one kind of input (PDF, Markdown,
//! serialized text units) into an [`OutlineDocument`]. The
//! [`ExtractorRegistry`] dispatches on file extension.
//!
//! # Example
//!
//! ```no_run
//! use docoutline::convert::{ExtractorRegistry, OutlineOptions};
//! use std::path::Path;
//!
//! fn main() -> docoutline::Result<()> {
//!     let registry = ExtractorRegistry::with_defaults();
//!     let doc = registry.extract(Path::new("report.pdf"), &OutlineOptions::default())?;
//!     println!("{}", doc.title);
//!     Ok(())
//! }
//! ```

mod batch;
mod blocks;
mod markdown;
mod pdf;

pub use batch::{batch_inputs, convert_dir, BatchOutcome, BatchReport};
pub use blocks::BlocksExtractor;
pub use markdown::{decode_bytes, MarkdownExtractor};
pub use pdf::PdfExtractor;

use crate::classify::{FontThresholds, PageMode, DEFAULT_LINES_PER_PAGE};
use crate::error::{Error, Result};
use crate::model::{OutlineDocument, TextUnit};
use crate::parser::ParseOptions;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Options for outline extraction.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Page mode for Markdown input
    pub mode: PageMode,

    /// Lines per page for page estimation (must be > 0)
    pub lines_per_page: u32,

    /// Re-parse Markdown in the alternate mode when the outline is empty
    pub fallback: bool,

    /// Text encoding label for Markdown input (WHATWG label, e.g. "utf-8")
    pub encoding: String,

    /// Font-size thresholds for PDF and unit input
    pub thresholds: FontThresholds,

    /// PDF reading options
    pub parse: ParseOptions,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Markdown page mode.
    pub fn with_mode(mut self, mode: PageMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set lines per page.
    pub fn with_lines_per_page(mut self, lines_per_page: u32) -> Self {
        self.lines_per_page = lines_per_page;
        self
    }

    /// Enable or disable the alternate-mode fallback.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the text encoding label.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set font-size thresholds.
    pub fn with_thresholds(mut self, thresholds: FontThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set PDF parse options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Check option values before any input is read.
    pub fn validate(&self) -> Result<()> {
        if self.lines_per_page == 0 {
            return Err(Error::InvalidLinesPerPage);
        }
        if encoding_rs::Encoding::for_label(self.encoding.as_bytes()).is_none() {
            return Err(Error::UnknownEncoding(self.encoding.clone()));
        }
        Ok(())
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            mode: PageMode::Strict,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            fallback: true,
            encoding: "utf-8".to_string(),
            thresholds: FontThresholds::default(),
            parse: ParseOptions::default(),
        }
    }
}

/// Trait for outline extractors.
///
/// Implement this trait to add support for a new input format.
pub trait SourceExtractor: Send + Sync {
    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this extractor.
    fn name(&self) -> &str;

    /// Extract the outline of a file.
    fn extract(&self, path: &Path, options: &OutlineOptions) -> Result<OutlineDocument>;

    /// Extract the outline from in-memory content.
    fn extract_bytes(&self, bytes: &[u8], options: &OutlineOptions) -> Result<OutlineDocument>;

    /// Text units of a file, before classification.
    fn units(&self, path: &Path, options: &OutlineOptions) -> Result<Vec<TextUnit>>;

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry mapping file extensions to extractors.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn SourceExtractor>>,
    by_name: HashMap<String, Arc<dyn SourceExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, Markdown and text-unit extractors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExtractor::new()));
        registry.register(Arc::new(MarkdownExtractor::new()));
        registry.register(Arc::new(BlocksExtractor::new()));
        registry
    }

    /// Register an extractor for all its supported extensions.
    pub fn register(&mut self, extractor: Arc<dyn SourceExtractor>) {
        for ext in extractor.supported_extensions() {
            self.extractors.insert(ext.to_lowercase(), extractor.clone());
        }
        self.by_name.insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get an extractor by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn SourceExtractor>> {
        self.extractors.get(&ext.to_lowercase()).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn SourceExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.extractors.contains_key(&ext.to_lowercase())
    }

    /// All supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extractors.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Extractor for a path: by extension, else by sniffing UTF-8 content.
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn SourceExtractor>> {
        self.resolve_with_encoding(path, encoding_rs::UTF_8)
    }

    /// Extractor for a path: by extension, else by sniffing content decoded
    /// with the configured encoding.
    pub fn resolve_for(
        &self,
        path: &Path,
        options: &OutlineOptions,
    ) -> Result<Arc<dyn SourceExtractor>> {
        let encoding = encoding_rs::Encoding::for_label(options.encoding.as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(options.encoding.clone()))?;
        self.resolve_with_encoding(path, encoding)
    }

    fn resolve_with_encoding(
        &self,
        path: &Path,
        encoding: &'static encoding_rs::Encoding,
    ) -> Result<Arc<dyn SourceExtractor>> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(extractor) = self.get_by_extension(ext) {
                return Ok(extractor);
            }
        }

        let kind = crate::detect::detect_source_kind_with_encoding(path, encoding)?;
        self.get_by_name(&kind.to_string()).ok_or_else(|| {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            Error::UnsupportedExtension(ext)
        })
    }

    /// Extract the outline of a file using the matching extractor.
    pub fn extract(&self, path: &Path, options: &OutlineOptions) -> Result<OutlineDocument> {
        options.validate()?;
        let extractor = self.resolve_for(path, options)?;
        log::debug!("extracting {} with '{}'", path.display(), extractor.name());
        extractor.extract(path, options)
    }

    /// Extract from bytes, choosing the extractor by extension.
    pub fn extract_bytes(
        &self,
        bytes: &[u8],
        ext: &str,
        options: &OutlineOptions,
    ) -> Result<OutlineDocument> {
        options.validate()?;
        let extractor = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedExtension(ext.to_string()))?;
        extractor.extract_bytes(bytes, options)
    }

    /// Text units of a file using the matching extractor.
    pub fn units(&self, path: &Path, options: &OutlineOptions) -> Result<Vec<TextUnit>> {
        options.validate()?;
        self.resolve_for(path, options)?.units(path, options)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_options_builder() {
        let options = OutlineOptions::new()
            .with_mode(PageMode::Estimated)
            .with_lines_per_page(40)
            .with_fallback(false)
            .with_encoding("latin1");

        assert_eq!(options.mode, PageMode::Estimated);
        assert_eq!(options.lines_per_page, 40);
        assert!(!options.fallback);
        assert_eq!(options.encoding, "latin1");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_outline_options_validate() {
        assert!(matches!(
            OutlineOptions::new().with_lines_per_page(0).validate(),
            Err(Error::InvalidLinesPerPage)
        ));
        assert!(matches!(
            OutlineOptions::new().with_encoding("klingon").validate(),
            Err(Error::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("MD"));
        assert!(registry.supports("json"));
        assert!(!registry.supports("docx"));
        assert_eq!(
            registry.supported_extensions(),
            vec!["json", "markdown", "md", "pdf", "txt"]
        );
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(registry.get_by_name("markdown").unwrap().name(), "markdown");
        assert_eq!(registry.get_by_extension("pdf").unwrap().name(), "pdf");
        assert_eq!(registry.get_by_name("units").unwrap().name(), "units");
    }

    #[test]
    fn test_extract_bytes_unsupported_extension() {
        let registry = ExtractorRegistry::with_defaults();
        let result = registry.extract_bytes(b"", "docx", &OutlineOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedExtension(ext)) if ext == "docx"));
    }

    #[test]
    fn test_extract_bytes_markdown() {
        let registry = ExtractorRegistry::with_defaults();
        let doc = registry
            .extract_bytes(b"# Title\n## Sub\n", "md", &OutlineOptions::default())
            .unwrap();
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.outline.len(), 2);
    }
}
