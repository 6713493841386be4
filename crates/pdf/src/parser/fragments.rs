//! Positioned text extraction from a page's content stream.
//!
//! Walks the decoded operators with a reduced PDF text state machine and
//! emits one [`TextFragment`] per shown string, placed at its baseline
//! origin in page space (text matrix combined with the current
//! transformation matrix). Glyph widths are not read from the font; the
//! pen is advanced by an approximation, which is enough to keep runs on a
//! line ordered left to right.
//!
//! | Operator | Action |
//! |----------|--------|
//! | `q` `Q` `cm` | Save / restore / concatenate the CTM |
//! | `BT` `ET` | Begin (reset matrices) / end text object |
//! | `Tf` | Set font and size |
//! | `Tm` `Td` `TD` `T*` `TL` | Position and leading |
//! | `Tc` `Tw` `Tz` `Ts` | Spacing, scaling, rise |
//! | `Tj` `TJ` `'` `"` | Show text |

use dematbt_core::text::TextFragment;

use super::backend::{ContentOp, FontResource, Operand, PageId, PdfBackend};
use super::cleanup::clean_glyph_text;
use crate::PdfError;

/// Approximate glyph advance as a fraction of the font size.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// A `TJ` kerning gap wider than this fraction of an average glyph is
/// read as a word break.
const KERNING_SPACE_RATIO: f32 = 0.3;

/// `[a, b, c, d, e, f]`, applied to row vectors: `[x y 1] * M`.
type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m1` applied first, then `m2`.
fn multiply(m1: &Matrix, m2: &Matrix) -> Matrix {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn matrix_from(op: &ContentOp) -> Option<Matrix> {
    let mut m = IDENTITY;
    for (i, slot) in m.iter_mut().enumerate() {
        *slot = op.number(i)?;
    }
    Some(m)
}

#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font: Option<FontResource>,
    font_size: f32,
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            font: None,
            font_size: 0.0,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

impl TextState {
    /// Baseline origin of the next glyph in page space.
    fn origin(&self) -> (f32, f32) {
        let m = multiply(&self.text_matrix, &self.ctm);
        (
            self.rise * m[2] + m[4],
            self.rise * m[3] + m[5],
        )
    }

    fn glyph_width(&self) -> f32 {
        self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Advance past `text` as if it had just been painted.
    fn advance_after(&mut self, text: &str) {
        let dx: f32 = text
            .chars()
            .map(|c| {
                let space = if c == ' ' { self.word_spacing } else { 0.0 };
                self.glyph_width() + self.char_spacing + space
            })
            .sum();
        self.advance_x(dx);
    }

    /// `Td`: translate the line matrix and restart the text matrix from it.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&[1.0, 0.0, 0.0, 1.0, tx, ty], &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }
}

/// Walk one page and return its positioned text runs.
pub fn extract_page_fragments(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<TextFragment>, PdfError> {
    let ops = backend.page_operations(page_id)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut fragments = Vec::new();

    for op in &ops {
        match op.operator.as_str() {
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.ctm_stack.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix_from(op) {
                    state.ctm = multiply(&m, &state.ctm);
                }
            }

            "BT" => {
                state.text_matrix = IDENTITY;
                state.line_matrix = IDENTITY;
            }
            "ET" => {}

            "Tf" => {
                if let (Some(Operand::Name(key)), Some(size)) = (op.operands.first(), op.number(1)) {
                    state.font = Some(
                        fonts
                            .iter()
                            .find(|f| &f.key == key)
                            .cloned()
                            .unwrap_or_else(|| FontResource {
                                key: key.clone(),
                                encoding: None,
                            }),
                    );
                    state.font_size = size;
                }
            }

            "Tm" => {
                if let Some(m) = matrix_from(op) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "TL" => {
                if let Some(v) = op.number(0) {
                    state.leading = v;
                }
            }

            "Tc" => {
                if let Some(v) = op.number(0) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.number(0) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.number(0) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = op.number(0) {
                    state.rise = v;
                }
            }

            "Tj" => {
                if let Some(operand) = op.operands.first() {
                    show_string(operand, backend, &mut state, &mut fragments);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = op.operands.first() {
                    show_array(items, backend, &mut state, &mut fragments);
                }
            }
            "'" => {
                state.next_line();
                if let Some(operand) = op.operands.first() {
                    show_string(operand, backend, &mut state, &mut fragments);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac), Some(operand)) =
                    (op.number(0), op.number(1), op.operands.get(2))
                {
                    state.word_spacing = aw;
                    state.char_spacing = ac;
                    state.next_line();
                    show_string(operand, backend, &mut state, &mut fragments);
                }
            }

            _ => {}
        }
    }

    log::trace!("page {:?}: {} fragment(s)", page_id, fragments.len());
    Ok(fragments)
}

fn decode(operand: &Operand, backend: &dyn PdfBackend, state: &TextState) -> String {
    match operand {
        Operand::Str(bytes) => clean_glyph_text(&backend.decode_text(state.font.as_ref(), bytes)),
        _ => String::new(),
    }
}

fn push_fragment(text: &str, origin: (f32, f32), fragments: &mut Vec<TextFragment>) {
    if !text.trim().is_empty() {
        fragments.push(TextFragment::new(text, origin.0, origin.1));
    }
}

fn show_string(
    operand: &Operand,
    backend: &dyn PdfBackend,
    state: &mut TextState,
    fragments: &mut Vec<TextFragment>,
) {
    let text = decode(operand, backend, state);
    push_fragment(&text, state.origin(), fragments);
    state.advance_after(&text);
}

/// `TJ`: strings interleaved with kerning adjustments in thousandths of
/// text space. The whole array becomes one fragment; wide negative
/// adjustments turn into spaces.
fn show_array(
    items: &[Operand],
    backend: &dyn PdfBackend,
    state: &mut TextState,
    fragments: &mut Vec<TextFragment>,
) {
    let origin = state.origin();
    let mut buf = String::new();

    for item in items {
        match item {
            Operand::Str(_) => {
                let piece = decode(item, backend, state);
                buf.push_str(&piece);
                state.advance_after(&piece);
            }
            other => {
                if let Some(adj) = other.as_number() {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    if dx > state.glyph_width() * KERNING_SPACE_RATIO && !buf.ends_with(' ') {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }

    push_fragment(buf.trim_end(), origin, fragments);
}
