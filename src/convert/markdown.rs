//! Markdown outline extractor.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;

use crate::classify::MarkdownClassifier;
use crate::error::{Error, Result};
use crate::model::{markdown_units, OutlineDocument, TextUnit};

use super::{OutlineOptions, SourceExtractor};

/// Decode bytes with a WHATWG encoding label.
///
/// A leading BOM of the same encoding is dropped. Malformed input is an
/// error rather than being replaced.
pub fn decode_bytes<'a>(bytes: &'a [u8], label: &str) -> Result<Cow<'a, str>> {
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;

    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| Error::Decode {
            encoding: encoding.name().to_string(),
        })
}

/// Extracts outlines from Markdown headings.
#[derive(Debug, Clone, Default)]
pub struct MarkdownExtractor {
    _private: (),
}

impl MarkdownExtractor {
    /// Create a new Markdown extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Parse decoded Markdown content.
    ///
    /// When the outline comes back empty and fallback is enabled, the
    /// content is parsed again in the alternate page mode.
    pub fn parse(&self, content: &str, options: &OutlineOptions) -> Result<OutlineDocument> {
        let classifier =
            MarkdownClassifier::new(options.mode).with_lines_per_page(options.lines_per_page);
        let doc = classifier.parse(content)?;

        if doc.outline.is_empty() && options.fallback {
            let alternate = classifier.alternate();
            log::debug!(
                "no headings in {:?} mode, retrying in {:?} mode",
                classifier.mode(),
                alternate.mode()
            );
            return alternate.parse(content);
        }

        Ok(doc)
    }

    fn read(&self, path: &Path, options: &OutlineOptions) -> Result<String> {
        let bytes = fs::read(path)?;
        Ok(decode_bytes(&bytes, &options.encoding)?.into_owned())
    }
}

impl SourceExtractor for MarkdownExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["md", "markdown", "txt"]
    }

    fn name(&self) -> &str {
        "markdown"
    }

    fn extract(&self, path: &Path, options: &OutlineOptions) -> Result<OutlineDocument> {
        let content = self.read(path, options)?;
        self.parse(&content, options)
    }

    fn extract_bytes(&self, bytes: &[u8], options: &OutlineOptions) -> Result<OutlineDocument> {
        let content = decode_bytes(bytes, &options.encoding)?;
        self.parse(&content, options)
    }

    fn units(&self, path: &Path, options: &OutlineOptions) -> Result<Vec<TextUnit>> {
        Ok(markdown_units(&self.read(path, options)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PageMode;

    #[test]
    fn test_decode_utf8_and_bom() {
        assert_eq!(decode_bytes(b"# Title", "utf-8").unwrap(), "# Title");
        assert_eq!(decode_bytes(b"\xEF\xBB\xBF# Title", "UTF-8").unwrap(), "# Title");
    }

    #[test]
    fn test_decode_legacy_encoding() {
        assert_eq!(decode_bytes(b"# Caf\xe9", "latin1").unwrap(), "# Café");
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_bytes(b"# Caf\xe9", "utf-8"),
            Err(Error::Decode { encoding }) if encoding == "UTF-8"
        ));
        assert!(matches!(
            decode_bytes(b"", "no-such-encoding"),
            Err(Error::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_fallback_to_alternate_mode() {
        // No headings in either mode: empty result after the retry.
        let extractor = MarkdownExtractor::new();
        let doc = extractor.parse("plain text\n", &OutlineOptions::default()).unwrap();
        assert!(doc.outline.is_empty());
        assert_eq!(doc.title, "");
    }

    #[test]
    fn test_mode_is_respected() {
        let mut content = String::from("# Start\n");
        content.push_str(&"text\n".repeat(60));
        content.push_str("## Later\n");

        let extractor = MarkdownExtractor::new();
        let strict = extractor.parse(&content, &OutlineOptions::default()).unwrap();
        assert_eq!(strict.outline[1].page, 1);

        let options = OutlineOptions::new().with_mode(PageMode::Estimated);
        let estimated = extractor.parse(&content, &options).unwrap();
        assert_eq!(estimated.outline[1].page, 2);
    }

    #[test]
    fn test_extract_bytes_with_encoding() {
        let options = OutlineOptions::new().with_encoding("windows-1252");
        let doc = MarkdownExtractor::new()
            .extract_bytes(b"# R\xe9sum\xe9\n", &options)
            .unwrap();
        assert_eq!(doc.title, "Résumé");
    }
}
