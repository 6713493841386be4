//! Whitespace normalization and reading-order reconstruction of page text.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A run of text placed on a page at a baseline position.
///
/// Coordinates are in page space: origin bottom-left, `y` grows upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        TextFragment {
            text: text.into(),
            x,
            y,
        }
    }
}

/// Collapse whitespace runs (non-breaking spaces included) into a single
/// ASCII space and trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rebuild an approximate reading order for one page.
///
/// Fragments are ordered top to bottom (descending `y`), then left to right
/// (ascending `x`) for fragments sharing a baseline. Columns that share a
/// baseline are not told apart.
pub fn assemble_page_text(fragments: &[TextFragment]) -> String {
    let mut picked: Vec<(&str, f32, f32)> = fragments
        .iter()
        .map(|f| (f.text.trim(), f.x, f.y))
        .filter(|(text, _, _)| !text.is_empty())
        .collect();

    picked.sort_by(|a, b| reading_order(a.1, a.2, b.1, b.2));

    let joined = picked
        .iter()
        .map(|(text, _, _)| *text)
        .collect::<Vec<_>>()
        .join(" ");

    normalize(&joined)
}

fn reading_order(ax: f32, ay: f32, bx: f32, by: f32) -> Ordering {
    by.total_cmp(&ay).then_with(|| ax.total_cmp(&bx))
}
