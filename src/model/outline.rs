//! Outline types: heading levels, entries, and the assembled document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Heading level, from `H1` (most prominent) to `H6`.
///
/// Serialized as the strings `"H1"` .. `"H6"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// All levels in order of decreasing prominence.
    pub const ALL: [HeadingLevel; 6] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];

    /// Level for a heading depth (1-6), e.g. the number of leading `#`.
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1..=6 => Some(Self::ALL[depth - 1]),
            _ => None,
        }
    }

    /// Numeric depth of this level (1-6).
    pub fn depth(self) -> u8 {
        self as u8 + 1
    }

    /// The wire name (`"H1"` .. `"H6"`).
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
            HeadingLevel::H5 => "H5",
            HeadingLevel::H6 => "H6",
        }
    }

    /// Whether a heading at this level may become the document title.
    pub fn is_title_candidate(self) -> bool {
        matches!(self, HeadingLevel::H1 | HeadingLevel::H2)
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("invalid heading level '{}' (expected H1-H6)", s))
    }
}

/// A detected heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text, trimmed and with inline formatting removed
    pub text: String,
    /// 1-based page number
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// A document title plus its headings in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    /// Document title (empty only when the outline is empty)
    pub title: String,
    /// Headings in detection order
    pub outline: Vec<OutlineEntry>,
}

impl OutlineDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no headings were found.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Iterate over the headings at one level.
    pub fn entries_at(&self, level: HeadingLevel) -> impl Iterator<Item = &OutlineEntry> {
        self.outline.iter().filter(move |e| e.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_depth() {
        assert_eq!(HeadingLevel::from_depth(1), Some(HeadingLevel::H1));
        assert_eq!(HeadingLevel::from_depth(6), Some(HeadingLevel::H6));
        assert_eq!(HeadingLevel::from_depth(0), None);
        assert_eq!(HeadingLevel::from_depth(7), None);
    }

    #[test]
    fn test_level_depth_and_name() {
        for (i, level) in HeadingLevel::ALL.iter().enumerate() {
            assert_eq!(level.depth() as usize, i + 1);
            assert_eq!(level.to_string(), format!("H{}", i + 1));
            assert_eq!(level.as_str().parse::<HeadingLevel>().unwrap(), *level);
        }
        assert!("H7".parse::<HeadingLevel>().is_err());
        assert!("h1".parse::<HeadingLevel>().is_err());
    }

    #[test]
    fn test_level_serializes_as_string() {
        let json = serde_json::to_string(&HeadingLevel::H3).unwrap();
        assert_eq!(json, "\"H3\"");
    }

    #[test]
    fn test_title_candidates() {
        assert!(HeadingLevel::H1.is_title_candidate());
        assert!(HeadingLevel::H2.is_title_candidate());
        assert!(!HeadingLevel::H3.is_title_candidate());
    }

    #[test]
    fn test_document_serialization_shape() {
        let doc = OutlineDocument {
            title: "Title".to_string(),
            outline: vec![
                OutlineEntry::new(HeadingLevel::H1, "Title", 1),
                OutlineEntry::new(HeadingLevel::H2, "Sub", 1),
            ],
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Title","outline":[{"level":"H1","text":"Title","page":1},{"level":"H2","text":"Sub","page":1}]}"#
        );
    }

    #[test]
    fn test_document_round_trip() {
        let doc = OutlineDocument {
            title: "Übersicht".to_string(),
            outline: vec![
                OutlineEntry::new(HeadingLevel::H1, "Übersicht", 1),
                OutlineEntry::new(HeadingLevel::H4, "Details", 7),
            ],
        };
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let back: OutlineDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_entries_at() {
        let doc = OutlineDocument {
            title: "A".to_string(),
            outline: vec![
                OutlineEntry::new(HeadingLevel::H1, "A", 1),
                OutlineEntry::new(HeadingLevel::H2, "B", 1),
                OutlineEntry::new(HeadingLevel::H2, "C", 2),
            ],
        };
        assert_eq!(doc.entries_at(HeadingLevel::H2).count(), 2);
        assert_eq!(doc.len(), 3);
        assert!(!doc.is_empty());
    }
}
