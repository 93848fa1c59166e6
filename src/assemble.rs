//! Outline assembly: turns a classifier's title and headings into the
//! final [`OutlineDocument`].

use crate::model::{OutlineDocument, OutlineEntry};

/// Build the final document from a title candidate and detected headings.
///
/// When no title was found (or it is blank) and there is at least one
/// heading, the first heading's text becomes the title. That heading stays
/// in the outline.
pub fn assemble(title: Option<String>, outline: Vec<OutlineEntry>) -> OutlineDocument {
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| outline.first().map(|e| e.text.clone()))
        .unwrap_or_default();

    if !outline.is_empty() {
        log::debug!("assembled outline '{}' with {} entries", title, outline.len());
    }

    OutlineDocument { title, outline }
}
