use std::convert::Infallible;

use crate::text::TextFragment;

/// Per-page access to positioned text, provided by a PDF reader.
///
/// Pages are 1-based. A failing call aborts the extraction run that made it.
pub trait PageSource {
    type Error;

    /// Total number of pages in the loaded document.
    fn page_count(&self) -> usize;

    /// Positioned text fragments of one page.
    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>, Self::Error>;
}

/// Pages already held in memory, one fragment list per page in order.
impl PageSource for [Vec<TextFragment>] {
    type Error = Infallible;

    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>, Self::Error> {
        Ok(page
            .checked_sub(1)
            .and_then(|idx| self.get(idx as usize))
            .cloned()
            .unwrap_or_default())
    }
}
