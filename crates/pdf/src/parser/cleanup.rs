use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Clean one decoded glyph run before it becomes a fragment.
///
/// Composes accents (NFC) so `PRE\u{0301}VUE` reads as `PRÉVUE`, expands
/// ligatures, and drops NUL and replacement characters left by unmapped
/// glyphs.
pub fn clean_glyph_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, expanded)) => out.push_str(expanded),
            None if c == '\0' || c == '\u{FFFD}' => {}
            None => out.push(c),
        }
    }
    out
}
