//! Input format detection.

use crate::error::{Error, Result};
use encoding_rs::{DecoderResult, Encoding, UTF_8};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Kind of source an outline can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// PDF document, classified by font size
    Pdf,
    /// Markdown text, classified by `#` headings
    Markdown,
    /// Serialized text units (JSON array)
    Units,
}

impl SourceKind {
    /// Source kind for a file extension (case-insensitive, no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(SourceKind::Pdf),
            "md" | "markdown" | "txt" => Some(SourceKind::Markdown),
            "json" => Some(SourceKind::Units),
            _ => None,
        }
    }

    /// Guess the source kind from leading UTF-8 bytes.
    ///
    /// `%PDF-` is a PDF, a leading `[` is a unit array, and anything else
    /// that decodes as UTF-8 is treated as Markdown.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        Self::sniff_with_encoding(data, UTF_8)
    }

    /// Guess the source kind from leading bytes in the given text encoding.
    ///
    /// Text that is malformed in `encoding` is not a known kind. A character
    /// cut off at the end of `data` is allowed.
    pub fn sniff_with_encoding(data: &[u8], encoding: &'static Encoding) -> Option<Self> {
        if data.starts_with(PDF_MAGIC) {
            return Some(SourceKind::Pdf);
        }

        let mut decoder = encoding.new_decoder_without_bom_handling();
        let mut text =
            String::with_capacity(decoder.max_utf8_buffer_length_without_replacement(data.len())?);
        let (result, _) = decoder.decode_to_string_without_replacement(data, &mut text, false);
        if let DecoderResult::Malformed(..) = result {
            return None;
        }

        if text.trim_start().starts_with('[') {
            Some(SourceKind::Units)
        } else {
            Some(SourceKind::Markdown)
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceKind::Pdf => "pdf",
            SourceKind::Markdown => "markdown",
            SourceKind::Units => "units",
        };
        f.write_str(name)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"
const SNIFF_LEN: usize = 512;

/// Detect PDF format from a file path.
///
/// # Example
/// ```no_run
/// use docoutline::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("document.pdf").unwrap();
/// println!("PDF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let header = read_header(path.as_ref(), 16)?;
    detect_format_from_bytes(&header)
}

/// Detect PDF format from the first bytes of a file.
///
/// Returns `Error::UnknownFormat` when the data does not start with a PDF
/// header and `Error::UnsupportedVersion` for a malformed version.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat { version })
}

/// Detect the source kind of a file: by extension first, then by content.
///
/// Content sniffing assumes UTF-8 text; see [`detect_source_kind_with_encoding`].
pub fn detect_source_kind<P: AsRef<Path>>(path: P) -> Result<SourceKind> {
    detect_source_kind_with_encoding(path, UTF_8)
}

/// Detect the source kind of a file, sniffing text content in `encoding`.
pub fn detect_source_kind_with_encoding<P: AsRef<Path>>(
    path: P,
    encoding: &'static Encoding,
) -> Result<SourceKind> {
    let path = path.as_ref();
    if let Some(kind) = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SourceKind::from_extension)
    {
        return Ok(kind);
    }

    let header = read_header(path, SNIFF_LEN)?;
    SourceKind::sniff_with_encoding(&header, encoding).ok_or(Error::UnknownFormat)
}

fn read_header(path: &Path, len: usize) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(len);
    file.take(len as u64).read_to_end(&mut header)?;
    Ok(header)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if a file is a valid PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes represent a valid PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
