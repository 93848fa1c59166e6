//! Heading classifiers.
//!
//! Both input paths implement [`HeadingClassifier`]: the font-size
//! heuristic for PDF text units and the header parser for Markdown
//! lines. Each produces the same [`OutlineDocument`] shape, so callers
//! can pick a classifier per source without caring which one runs.
//!
//! # Example
//!
//! ```
//! use docoutline::classify::{HeadingClassifier, FontSizeClassifier};
//! use docoutline::TextUnit;
//!
//! let units = vec![
//!     TextUnit::span("Annual Report", 24.0, 1),
//!     TextUnit::span("Summary", 16.0, 1),
//!     TextUnit::span("Revenue grew.", 10.0, 1),
//! ];
//! let doc = FontSizeClassifier::new().classify(&units)?;
//! assert_eq!(doc.title, "Annual Report");
//! assert_eq!(doc.outline.len(), 1);
//! # Ok::<(), docoutline::Error>(())
//! ```

mod font_size;
mod markdown;
pub mod page;

pub use font_size::{FontSizeClassifier, FontThresholds};
pub use markdown::{strip_inline_formatting, MarkdownClassifier};
pub use page::{PageMode, DEFAULT_LINES_PER_PAGE};

use crate::error::Result;
use crate::model::{OutlineDocument, TextUnit};

/// Turns extracted text units into an outline.
///
/// Implementations hold configuration only; every call starts from fresh
/// state, so one classifier can be shared between threads.
pub trait HeadingClassifier: Send + Sync {
    /// Short name of the classifier (e.g. `"font-size"`).
    fn name(&self) -> &str;

    /// Classify the units in document order.
    fn classify(&self, units: &[TextUnit]) -> Result<OutlineDocument>;
}
