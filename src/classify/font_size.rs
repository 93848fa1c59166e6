//! Font-size heading heuristic for PDF text units.

use crate::assemble::assemble;
use crate::error::{Error, Result};
use crate::model::{HeadingLevel, OutlineDocument, OutlineEntry, TextUnit};

use super::HeadingClassifier;

/// Font-size thresholds (points) for the three heading levels.
///
/// A unit is assigned the first level whose threshold it strictly
/// exceeds; anything at or below `h3` is body text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontThresholds {
    /// Sizes above this are H1
    pub h1: f32,
    /// Sizes above this are H2
    pub h2: f32,
    /// Sizes above this are H3
    pub h3: f32,
}

impl FontThresholds {
    /// Level for a font size, or `None` for body text.
    pub fn level_for(&self, size: f32) -> Option<HeadingLevel> {
        if size > self.h1 {
            Some(HeadingLevel::H1)
        } else if size > self.h2 {
            Some(HeadingLevel::H2)
        } else if size > self.h3 {
            Some(HeadingLevel::H3)
        } else {
            None
        }
    }
}

impl Default for FontThresholds {
    fn default() -> Self {
        Self {
            h1: 18.0,
            h2: 14.0,
            h3: 12.0,
        }
    }
}

/// Classifies PDF text units by font size.
///
/// The largest size in the document is reserved for the title: the first
/// unit at that size becomes the title and no unit at that size enters the
/// outline. Other units map to H1-H3 through [`FontThresholds`].
#[derive(Debug, Clone, Default)]
pub struct FontSizeClassifier {
    thresholds: FontThresholds,
}

impl FontSizeClassifier {
    /// Create a classifier with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom thresholds.
    pub fn with_thresholds(mut self, thresholds: FontThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// The thresholds in use.
    pub fn thresholds(&self) -> FontThresholds {
        self.thresholds
    }
}

impl HeadingClassifier for FontSizeClassifier {
    fn name(&self) -> &str {
        "font-size"
    }

    fn classify(&self, units: &[TextUnit]) -> Result<OutlineDocument> {
        if units.is_empty() {
            return Ok(OutlineDocument::new());
        }

        let sizes = units
            .iter()
            .enumerate()
            .map(|(index, unit)| {
                unit.font_size.ok_or(Error::MalformedUnit {
                    index,
                    field: "size",
                })
            })
            .collect::<Result<Vec<f32>>>()?;

        let max_size = sizes.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        // First unit at the maximum size, in input order.
        let title = units
            .iter()
            .zip(&sizes)
            .find(|(_, size)| **size >= max_size)
            .map(|(unit, _)| unit.text.clone());

        let outline: Vec<OutlineEntry> = units
            .iter()
            .zip(&sizes)
            .filter(|(_, size)| **size < max_size)
            .filter_map(|(unit, size)| {
                self.thresholds
                    .level_for(*size)
                    .map(|level| OutlineEntry::new(level, unit.text.trim(), unit.page))
            })
            .collect();

        log::debug!(
            "font-size classifier: {} units, max size {}, {} headings",
            units.len(),
            max_size,
            outline.len()
        );

        Ok(assemble(title, outline))
    }
}
