//! Page number resolution for Markdown headings.
//!
//! A heading line either carries an explicit page cue (a bracketed tag
//! such as `[L3-4]`, `page 12`, `p. 7`) or gets a page estimated from its
//! line position.

use std::sync::OnceLock;

use regex::Regex;

/// How the Markdown parser assigns page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMode {
    /// Explicit cues only; untagged headings stay on page 1.
    #[default]
    Strict,
    /// Estimate pages from line position, honoring explicit cues.
    Estimated,
}

impl PageMode {
    /// The other mode, used when a parse finds no headings.
    pub fn alternate(self) -> Self {
        match self {
            PageMode::Strict => PageMode::Estimated,
            PageMode::Estimated => PageMode::Strict,
        }
    }
}

/// Default lines-per-page density for page estimation.
pub const DEFAULT_LINES_PER_PAGE: u32 = 50;

/// Page cue matchers in priority order. Reordering them changes the
/// result for lines that contain more than one cue.
const PAGE_CUE_PATTERNS: [&str; 3] = [
    // [L1-2], [page 3], [12]
    r"\[.*?(\d+).*?\]",
    // page 4, Page4
    r"(?i)page\s*(\d+)",
    // p. 5, p5
    r"(?i)p\.?\s*(\d+)",
];

fn page_cue_matchers() -> &'static [Regex] {
    static MATCHERS: OnceLock<Vec<Regex>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        PAGE_CUE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("page cue pattern"))
            .collect()
    })
}

/// Find an explicit page cue in a line.
///
/// Matchers are tried in priority order and the first one that matches
/// decides. A cue of `0`, or one too large for a page number, counts as
/// no cue.
pub fn extract_page_cue(line: &str) -> Option<u32> {
    let caps = page_cue_matchers()
        .iter()
        .find_map(|re| re.captures(line))?;
    caps.get(1)?
        .as_str()
        .parse::<u32>()
        .ok()
        .filter(|page| *page > 0)
}

/// Estimate the page of a 1-based line number.
///
/// `lines_per_page` must be non-zero; callers validate it up front.
pub fn estimate_page(line_number: u32, lines_per_page: u32) -> u32 {
    let lines_per_page = lines_per_page.max(1);
    (line_number.saturating_sub(1) / lines_per_page + 1).max(1)
}

/// Resolve the page of a heading line.
///
/// `current_page` is the parser's running page and `line_number` the
/// 1-based position of the line. Returns the page to store and the new
/// running page.
pub fn resolve_page(
    mode: PageMode,
    line: &str,
    line_number: u32,
    lines_per_page: u32,
    current_page: u32,
) -> (u32, u32) {
    match mode {
        PageMode::Strict => {
            let page = extract_page_cue(line).unwrap_or(current_page);
            (page, current_page)
        }
        PageMode::Estimated => {
            let estimated = estimate_page(line_number, lines_per_page);
            let current_page = estimated;
            let explicit = extract_page_cue(line).unwrap_or(current_page);
            // Compared against the running page, not the estimate. Both are
            // the same value here; kept apart so the rule stays visible.
            let page = if explicit != current_page {
                explicit
            } else {
                estimated
            };
            (page, current_page)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_cue() {
        assert_eq!(extract_page_cue("### Section [L3-4]"), Some(3));
        assert_eq!(extract_page_cue("# Intro [L10-12]"), Some(10));
        assert_eq!(extract_page_cue("## Part [page 7]"), Some(7));
    }

    #[test]
    fn test_word_cue() {
        assert_eq!(extract_page_cue("## Results page 12"), Some(12));
        assert_eq!(extract_page_cue("## Results PAGE12"), Some(12));
    }

    #[test]
    fn test_abbreviation_cue() {
        assert_eq!(extract_page_cue("## Results p. 5"), Some(5));
        assert_eq!(extract_page_cue("## Results p5"), Some(5));
        assert_eq!(extract_page_cue("## Step 3"), Some(3));
    }

    #[test]
    fn test_cue_priority() {
        // The bracket matcher wins over a later "page" word.
        assert_eq!(extract_page_cue("## See page 9 [L2-3]"), Some(2));
        // "page" wins over "p" even though "p" would match earlier text.
        assert_eq!(extract_page_cue("## Chapter p4 page 8"), Some(8));
    }

    #[test]
    fn test_no_cue() {
        assert_eq!(extract_page_cue("# Introduction"), None);
        assert_eq!(extract_page_cue("# Appendix"), None);
        assert_eq!(extract_page_cue("# Empty [note]"), None);
    }

    #[test]
    fn test_zero_and_overflow_cues_are_ignored() {
        assert_eq!(extract_page_cue("# Cover [0]"), None);
        assert_eq!(extract_page_cue("# Huge [99999999999999]"), None);
    }

    #[test]
    fn test_estimate_page_boundaries() {
        assert_eq!(estimate_page(1, 50), 1);
        assert_eq!(estimate_page(50, 50), 1);
        assert_eq!(estimate_page(51, 50), 2);
        assert_eq!(estimate_page(100, 50), 2);
        assert_eq!(estimate_page(101, 50), 3);
        assert_eq!(estimate_page(0, 50), 1);
        assert_eq!(estimate_page(7, 1), 7);
    }

    #[test]
    fn test_resolve_strict() {
        assert_eq!(resolve_page(PageMode::Strict, "# A", 120, 50, 1), (1, 1));
        assert_eq!(
            resolve_page(PageMode::Strict, "# A [L9-10]", 120, 50, 1),
            (9, 1)
        );
    }

    #[test]
    fn test_resolve_estimated() {
        assert_eq!(resolve_page(PageMode::Estimated, "# A", 51, 50, 1), (2, 2));
        assert_eq!(
            resolve_page(PageMode::Estimated, "# A [L9-10]", 51, 50, 1),
            (9, 2)
        );
        // A cue equal to the estimate stores the estimate.
        assert_eq!(
            resolve_page(PageMode::Estimated, "# A [L2]", 51, 50, 1),
            (2, 2)
        );
    }

    #[test]
    fn test_alternate_mode() {
        assert_eq!(PageMode::Strict.alternate(), PageMode::Estimated);
        assert_eq!(PageMode::Estimated.alternate(), PageMode::Strict);
    }
}
