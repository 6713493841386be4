//! Explicit extraction context: the selected file and the last result.

use thiserror::Error;

use crate::day::day_from_filename;
use crate::extract::ExtractOptions;
use crate::segment::{extract, Progress};
use crate::source::PageSource;
use crate::types::ExtractionResult;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError<E> {
    #[error("No PDF selected")]
    NoFileSelected,
    #[error("{0}")]
    Source(E),
}

/// State of one technician session.
///
/// Selecting a file pre-resolves the day from its name. A successful
/// extraction replaces the result wholesale; a failed one leaves every field
/// as it was. Runs take `&mut self`, so two cannot overlap.
#[derive(Debug, Default)]
pub struct Session {
    file_name: String,
    bytes: Option<Vec<u8>>,
    result: Option<ExtractionResult>,
    day: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.file_name = file_name.into();
        self.day = day_from_filename(&self.file_name);
        self.bytes = Some(bytes);
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        self.result.as_ref()
    }

    /// Day of the last run, or the one read from the file name.
    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }

    /// Open the selected bytes with `open` and run a full extraction.
    pub fn extract<S, O, F>(
        &mut self,
        open: O,
        options: &ExtractOptions,
        on_progress: F,
    ) -> Result<&ExtractionResult, SessionError<S::Error>>
    where
        S: PageSource,
        O: FnOnce(&[u8]) -> Result<S, S::Error>,
        F: FnMut(Progress),
    {
        let bytes = self.bytes.as_deref().ok_or(SessionError::NoFileSelected)?;
        let source = open(bytes).map_err(SessionError::Source)?;
        let result =
            extract(&source, &self.file_name, options, on_progress).map_err(SessionError::Source)?;

        if result.day.is_some() {
            self.day = result.day.clone();
        }
        Ok(self.result.insert(result))
    }

    /// Restore a result produced earlier, e.g. from a cache.
    pub fn restore(&mut self, file_name: impl Into<String>, result: ExtractionResult) {
        self.file_name = file_name.into();
        self.day = result.day.clone().or_else(|| day_from_filename(&self.file_name));
        self.bytes = None;
        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextFragment;

    /// Treats the bytes as UTF-8 with one page per line.
    struct LinesSource(Vec<String>);

    impl PageSource for LinesSource {
        type Error = String;

        fn page_count(&self) -> usize {
            self.0.len()
        }

        fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>, String> {
            let line = &self.0[(page - 1) as usize];
            Ok(vec![TextFragment::new(line.clone(), 0.0, 0.0)])
        }
    }

    fn open_lines(bytes: &[u8]) -> Result<LinesSource, String> {
        let text = std::str::from_utf8(bytes).map_err(|_| "malformed input".to_string())?;
        Ok(LinesSource(text.lines().map(str::to_string).collect()))
    }

    #[test]
    fn test_select_file_resolves_day_from_name() {
        let mut session = Session::new();
        session.select_file("JOURNEE_2024-03-07_site.pdf", vec![]);
        assert_eq!(session.day(), Some("2024-03-07"));
        assert!(session.result().is_none());
    }

    #[test]
    fn test_extract_without_file() {
        let mut session = Session::new();
        let err = session
            .extract(open_lines, &ExtractOptions::default(), |_| {})
            .unwrap_err();
        assert_eq!(err, SessionError::NoFileSelected);
    }

    #[test]
    fn test_extract_replaces_result() {
        let mut session = Session::new();
        session.select_file("a.pdf", b"BT11111111\nPLAN".to_vec());
        session
            .extract(open_lines, &ExtractOptions::default(), |_| {})
            .unwrap();
        assert_eq!(session.result().unwrap().tickets[0].id, "BT11111111");

        session.select_file("b.pdf", b"BT22222222\nBT33333333".to_vec());
        let result = session
            .extract(open_lines, &ExtractOptions::default(), |_| {})
            .unwrap();
        let ids: Vec<&str> = result.tickets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["BT22222222", "BT33333333"]);
    }

    #[test]
    fn test_malformed_input_keeps_prior_result() {
        let mut session = Session::new();
        session.select_file("JOURNEE_2024-03-07.pdf", b"BT11111111 DATE PREVUE 07/03/2024".to_vec());
        let before = session
            .extract(open_lines, &ExtractOptions::default(), |_| {})
            .unwrap()
            .clone();

        session.bytes = Some(vec![0xFF, 0xFE, 0x00]);
        let err = session
            .extract(open_lines, &ExtractOptions::default(), |_| {})
            .unwrap_err();

        assert_eq!(err, SessionError::Source("malformed input".to_string()));
        assert_eq!(session.result(), Some(&before));
        assert_eq!(session.day(), Some("2024-03-07"));
    }

    #[test]
    fn test_filename_day_kept_when_run_resolves_none() {
        let mut session = Session::new();
        session.select_file("JOURNEE_2024_03_07.pdf", b"PLAN".to_vec());
        let result = session
            .extract(open_lines, &ExtractOptions::default(), |_| {})
            .unwrap();
        assert!(result.tickets.is_empty());
        assert_eq!(session.day(), Some("2024-03-07"));
    }

    #[test]
    fn test_restore() {
        let mut session = Session::new();
        session.restore(
            "JOURNEE_2024-03-07.pdf",
            ExtractionResult {
                day: None,
                ..Default::default()
            },
        );
        assert_eq!(session.day(), Some("2024-03-07"));
        assert!(session.bytes().is_none());
        assert!(session.result().is_some());
    }
}
