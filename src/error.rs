//! Error types for the docoutline library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting an outline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not in a recognized format.
    #[error("Unknown file format: not a PDF, Markdown, or text-unit JSON source")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// The encoding label is not known.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// The input bytes are not valid in the requested encoding.
    #[error("Cannot decode input with encoding '{encoding}'")]
    Decode {
        /// Canonical name of the encoding that was used
        encoding: String,
    },

    /// Lines-per-page density must be positive.
    #[error("Lines per page must be greater than zero")]
    InvalidLinesPerPage,

    /// A text unit lacks a field the classifier depends on.
    #[error("Text unit {index} is missing required field '{field}'")]
    MalformedUnit {
        /// Position of the unit in the input sequence
        index: usize,
        /// Name of the missing field
        field: &'static str,
    },

    /// Serialized text units could not be read.
    #[error("Invalid text unit data: {0}")]
    UnitData(String),

    /// No extractor is registered for a file extension.
    #[error("No extractor for extension: {0}")]
    UnsupportedExtension(String),

    /// Two batch inputs map to the same output file.
    #[error("Output {} is already written for {}", output.display(), first.display())]
    OutputConflict {
        /// Output file both inputs map to
        output: PathBuf,
        /// Input that was assigned the output first
        first: PathBuf,
    },

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::MalformedUnit {
            index: 3,
            field: "size",
        };
        assert_eq!(
            err.to_string(),
            "Text unit 3 is missing required field 'size'"
        );
    }

    #[test]
    fn test_decode_error_names_encoding() {
        let err = Error::Decode {
            encoding: "UTF-8".to_string(),
        };
        assert!(err.to_string().contains("'UTF-8'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
