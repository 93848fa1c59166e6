//! Data model shared by the extractors and classifiers.
//!
//! Extractors produce [`TextUnit`]s; classifiers turn them into an
//! [`OutlineDocument`] made of [`OutlineEntry`] values.

mod outline;
mod unit;

pub use outline::{HeadingLevel, OutlineDocument, OutlineEntry};
pub use unit::{markdown_units, TextUnit};
