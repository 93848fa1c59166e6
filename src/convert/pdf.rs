//! PDF outline extractor.

use std::path::Path;

use crate::classify::{FontSizeClassifier, HeadingClassifier};
use crate::error::Result;
use crate::model::{OutlineDocument, TextUnit};
use crate::parser::PdfReader;

use super::{OutlineOptions, SourceExtractor};

/// Extracts outlines from PDF documents using font sizes.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    _private: (),
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn classify(&self, units: &[TextUnit], options: &OutlineOptions) -> Result<OutlineDocument> {
        FontSizeClassifier::new()
            .with_thresholds(options.thresholds)
            .classify(units)
    }
}

impl SourceExtractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, path: &Path, options: &OutlineOptions) -> Result<OutlineDocument> {
        let units = self.units(path, options)?;
        self.classify(&units, options)
    }

    fn extract_bytes(&self, bytes: &[u8], options: &OutlineOptions) -> Result<OutlineDocument> {
        crate::detect::detect_format_from_bytes(bytes)?;
        let reader = PdfReader::from_bytes_with_options(bytes, options.parse.clone())?;
        self.classify(&reader.read_units()?, options)
    }

    fn units(&self, path: &Path, options: &OutlineOptions) -> Result<Vec<TextUnit>> {
        PdfReader::open_with_options(path, options.parse.clone())?.read_units()
    }
}
