//! Extractor for serialized text units.
//!
//! Input is a JSON array of `{"text", "size", "page", "font"?}` objects, as
//! produced by `docoutline units`. The units are classified by font size.

use std::fs;
use std::path::Path;

use crate::classify::{FontSizeClassifier, HeadingClassifier};
use crate::error::{Error, Result};
use crate::model::{OutlineDocument, TextUnit};

use super::{OutlineOptions, SourceExtractor};

/// Parse a JSON array of text units.
pub fn parse_units(json: &[u8]) -> Result<Vec<TextUnit>> {
    serde_json::from_slice(json).map_err(|e| Error::UnitData(e.to_string()))
}

/// Classifies serialized text units by font size.
#[derive(Debug, Clone, Default)]
pub struct BlocksExtractor {
    _private: (),
}

impl BlocksExtractor {
    /// Create a new text-unit extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl SourceExtractor for BlocksExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "units"
    }

    fn extract(&self, path: &Path, options: &OutlineOptions) -> Result<OutlineDocument> {
        let units = self.units(path, options)?;
        FontSizeClassifier::new()
            .with_thresholds(options.thresholds)
            .classify(&units)
    }

    fn extract_bytes(&self, bytes: &[u8], options: &OutlineOptions) -> Result<OutlineDocument> {
        FontSizeClassifier::new()
            .with_thresholds(options.thresholds)
            .classify(&parse_units(bytes)?)
    }

    fn units(&self, path: &Path, _options: &OutlineOptions) -> Result<Vec<TextUnit>> {
        parse_units(&fs::read(path)?)
    }
}
