use serde::{Deserialize, Serialize};

/// Request to render one page of the loaded document.
///
/// The core never renders anything itself; it hands this to whichever
/// collaborator owns the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// 1-based page number.
    pub page: u32,
    pub title: String,
}

impl RenderRequest {
    pub fn new(page: u32, title: impl Into<String>) -> Self {
        Self {
            page,
            title: title.into(),
        }
    }

    /// Pin the page into `1..=page_count`.
    pub fn clamp(mut self, page_count: usize) -> Self {
        let last = u32::try_from(page_count).unwrap_or(u32::MAX).max(1);
        self.page = self.page.clamp(1, last);
        self
    }
}
