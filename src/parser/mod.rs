//! PDF text-unit extraction module.

mod backend;
mod options;
mod pdf_reader;
mod spans;

pub use backend::{decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_reader::PdfReader;
pub use spans::{collect_page_spans, group_spans_into_lines, TextLine, TextSpan};
