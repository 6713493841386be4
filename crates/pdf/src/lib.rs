//! PDF page reader for DEMAT-BT.
//!
//! Loads a document with `lopdf`, walks each page's content stream and
//! returns positioned [`TextFragment`]s. [`PdfDocument`] implements
//! [`PageSource`], so it plugs straight into the core segmentation.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use dematbt_core::source::PageSource;
use dematbt_core::text::{assemble_page_text, TextFragment};
use dematbt_core::view::RenderRequest;

use parser::backend::{LopdfBackend, PageId, PdfBackend};

pub mod parser;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Malformed PDF: {0}")]
    MalformedInput(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("Page not found: {0}")]
    PageNotFound(u32),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One page prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// 1-based, after clamping.
    pub page: u32,
    pub page_count: usize,
    pub title: String,
    /// Page text in reading order.
    pub text: String,
}

/// A loaded PDF document.
///
/// Constructed via [`PdfDocument::from_bytes`] or [`PdfDocument::open`].
/// The page table is read once at load time.
pub struct PdfDocument<B: PdfBackend = LopdfBackend> {
    backend: B,
    pages: BTreeMap<u32, PageId>,
}

impl PdfDocument<LopdfBackend> {
    /// Parse PDF bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        Ok(Self::from_backend(LopdfBackend::load_bytes(bytes)?))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl<B: PdfBackend> PdfDocument<B> {
    pub fn from_backend(backend: B) -> Self {
        let pages = backend.pages();
        log::debug!("loaded PDF with {} page(s)", pages.len());
        Self { backend, pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Positioned text runs of a 1-based page.
    pub fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>, PdfError> {
        let page_id = *self.pages.get(&page).ok_or(PdfError::PageNotFound(page))?;
        parser::fragments::extract_page_fragments(&self.backend, page_id)
    }

    /// Reading-order text of a 1-based page.
    pub fn page_text(&self, page: u32) -> Result<String, PdfError> {
        Ok(assemble_page_text(&self.page_fragments(page)?))
    }

    /// Resolve a render request, clamping its page into the document.
    pub fn render(&self, request: &RenderRequest) -> Result<RenderedPage, PdfError> {
        let request = request.clone().clamp(self.page_count());
        let text = if self.pages.is_empty() {
            String::new()
        } else {
            self.page_text(request.page)?
        };

        Ok(RenderedPage {
            page: request.page,
            page_count: self.page_count(),
            title: request.title,
            text,
        })
    }
}

impl<B: PdfBackend> PageSource for PdfDocument<B> {
    type Error = PdfError;

    fn page_count(&self) -> usize {
        PdfDocument::page_count(self)
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>, PdfError> {
        PdfDocument::page_fragments(self, page)
    }
}
