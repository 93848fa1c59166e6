//! PDF text-unit reader.

use std::io::Read;
use std::path::Path;

use rayon::prelude::*;

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::TextUnit;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::options::{ErrorMode, PageSelection, ParseOptions};
use super::spans::{collect_page_spans, group_spans_into_lines};

/// Reads positioned text lines from a PDF as [`TextUnit`]s.
///
/// Each visual line becomes one unit carrying the line text, the font size
/// and name of its first span, and its 1-based page number. Units are
/// returned in page order, top to bottom within a page.
pub struct PdfReader<B: PdfBackend = LopdfBackend> {
    backend: B,
    options: ParseOptions,
}

impl PdfReader<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_format_from_path(path)?;

        let backend = LopdfBackend::load_file(path)?;
        Self::with_backend(backend, options)
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Read a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(data)?;
        Self::with_backend(backend, options)
    }

    /// Read a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let backend = LopdfBackend::load_reader(reader)?;
        Self::with_backend(backend, ParseOptions::default())
    }
}

impl<B: PdfBackend> PdfReader<B> {
    /// Wrap an existing backend.
    ///
    /// Encrypted documents are rejected since their content streams cannot
    /// be decoded.
    pub fn with_backend(backend: B, options: ParseOptions) -> Result<Self> {
        if backend.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { backend, options })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// The options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Read the text units of the selected pages.
    pub fn read_units(&self) -> Result<Vec<TextUnit>> {
        let pages = self.selected_pages()?;

        let per_page: Vec<Result<Vec<TextUnit>>> = if self.options.parallel {
            pages
                .par_iter()
                .map(|(num, id)| self.read_page_checked(*num, *id))
                .collect()
        } else {
            pages
                .iter()
                .map(|(num, id)| self.read_page_checked(*num, *id))
                .collect()
        };

        let mut units = Vec::new();
        for page_units in per_page {
            units.extend(page_units?);
        }

        log::debug!(
            "read {} text units from {} pages",
            units.len(),
            pages.len()
        );
        Ok(units)
    }

    /// Read the text units of one page.
    pub fn read_page(&self, page_num: u32) -> Result<Vec<TextUnit>> {
        let pages = self.backend.pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.extract_page(page_num, *page_id)
    }

    fn selected_pages(&self) -> Result<Vec<(u32, PageId)>> {
        let pages = self.backend.pages();
        let total = pages.len() as u32;

        let requested: Vec<u32> = match &self.options.pages {
            PageSelection::All => Vec::new(),
            PageSelection::Range(range) => vec![*range.start(), *range.end()],
            PageSelection::Pages(list) => list.clone(),
        };
        if let Some(&missing) = requested.iter().find(|n| !pages.contains_key(n)) {
            return Err(Error::PageOutOfRange(missing, total));
        }

        Ok(pages
            .into_iter()
            .filter(|(num, _)| self.options.pages.includes(*num))
            .collect())
    }

    fn read_page_checked(&self, page_num: u32, page_id: PageId) -> Result<Vec<TextUnit>> {
        match self.extract_page(page_num, page_id) {
            Ok(units) => Ok(units),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Failed to read text from page {}: {}", page_num, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn extract_page(&self, page_num: u32, page_id: PageId) -> Result<Vec<TextUnit>> {
        let fonts = self.backend.page_fonts(page_id)?;
        let operations = self.backend.page_operations(page_id)?;
        let spans = collect_page_spans(&self.backend, page_id, &operations, &fonts);

        let units: Vec<TextUnit> = group_spans_into_lines(spans)
            .into_iter()
            .filter_map(|line| line.into_unit(page_num))
            .collect();

        log::debug!("page {}: {} lines", page_num, units.len());
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::parser::backend::{ContentOp, PdfValue};

    /// In-memory backend: one list of operations per page.
    struct FakeBackend {
        pages: Vec<Option<Vec<ContentOp>>>,
        encrypted: bool,
    }

    fn show(size: i64, y: i64, text: &str) -> Vec<ContentOp> {
        let op = |operator: &str, operands: Vec<PdfValue>| ContentOp {
            operator: operator.to_string(),
            operands,
        };
        vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(size)]),
            op("Td", vec![PdfValue::Integer(72), PdfValue::Integer(y)]),
            op("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())]),
            op("ET", vec![]),
        ]
    }

    impl PdfBackend for FakeBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            (1..=self.pages.len() as u32).map(|n| (n, (n, 0))).collect()
        }

        fn page_fonts(&self, _page: PageId) -> Result<BTreeMap<Vec<u8>, String>> {
            Ok(BTreeMap::from([(b"F1".to_vec(), "Times-Roman".to_string())]))
        }

        fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>> {
            self.pages[page.0 as usize - 1]
                .clone()
                .ok_or_else(|| Error::PdfParse("broken stream".to_string()))
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }

        fn is_encrypted(&self) -> bool {
            self.encrypted
        }
    }

    fn backend() -> FakeBackend {
        let mut first = show(24, 700, "Report");
        first.extend(show(16, 650, "Overview"));
        FakeBackend {
            pages: vec![Some(first), None, Some(show(13, 700, "Details"))],
            encrypted: false,
        }
    }

    #[test]
    fn test_read_units_lenient_skips_broken_page() {
        for parallel in [true, false] {
            let options = ParseOptions::new().lenient().with_parallel(parallel);
            let reader = PdfReader::with_backend(backend(), options).unwrap();
            let units = reader.read_units().unwrap();
            let texts: Vec<(&str, u32)> = units.iter().map(|u| (u.text.as_str(), u.page)).collect();
            assert_eq!(texts, vec![("Report", 1), ("Overview", 1), ("Details", 3)]);
            assert_eq!(units[0].font_size, Some(24.0));
            assert_eq!(units[0].font_name.as_deref(), Some("Times-Roman"));
        }
    }

    #[test]
    fn test_read_units_strict_fails_on_broken_page() {
        let reader = PdfReader::with_backend(backend(), ParseOptions::new()).unwrap();
        assert!(matches!(reader.read_units(), Err(Error::PdfParse(_))));
    }

    #[test]
    fn test_page_selection() {
        let options = ParseOptions::new().with_pages(PageSelection::Pages(vec![3]));
        let reader = PdfReader::with_backend(backend(), options).unwrap();
        let units = reader.read_units().unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "Details");
    }

    #[test]
    fn test_page_out_of_range() {
        let options = ParseOptions::new().with_pages(PageSelection::Range(2..=9));
        let reader = PdfReader::with_backend(backend(), options).unwrap();
        assert!(matches!(
            reader.read_units(),
            Err(Error::PageOutOfRange(9, 3))
        ));
        assert!(matches!(reader.read_page(4), Err(Error::PageOutOfRange(4, 3))));
    }

    #[test]
    fn test_encrypted_rejected() {
        let mut fake = backend();
        fake.encrypted = true;
        assert!(matches!(
            PdfReader::with_backend(fake, ParseOptions::new()),
            Err(Error::Encrypted)
        ));
    }

    #[test]
    fn test_page_count() {
        let reader = PdfReader::with_backend(backend(), ParseOptions::new()).unwrap();
        assert_eq!(reader.page_count(), 3);
    }

    /// Records every log line so tests can check levels.
    struct CaptureLogger {
        records: std::sync::Mutex<Vec<(log::Level, String, String)>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((
                    record.level(),
                    record.target().to_string(),
                    record.args().to_string(),
                ));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger {
        records: std::sync::Mutex::new(Vec::new()),
    };

    #[test]
    fn test_read_summary_logged_at_debug() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);

        let reader = PdfReader::with_backend(backend(), ParseOptions::new().lenient()).unwrap();
        reader.read_units().unwrap();

        let records = CAPTURE.records.lock().unwrap();
        let summaries: Vec<log::Level> = records
            .iter()
            .filter(|(_, target, message)| {
                target == module_path!().trim_end_matches("::tests")
                    && message.starts_with("read ")
                    && message.contains("text units")
            })
            .map(|(level, _, _)| *level)
            .collect();
        assert!(!summaries.is_empty());
        assert!(summaries.iter().all(|level| *level == log::Level::Debug));
    }
}
