//! Best-effort field scraping on normalized page text.
//!
//! Every extractor is total: no match yields `None`, never an error. The
//! patterns target the French work-order forms ("OBJET", "DATE PRÉVUE",
//! "NOM CLIENT", ...) and tolerate the noise left by text reconstruction.

use std::sync::OnceLock;

use regex::Regex;

use crate::text::normalize;
use crate::types::{DocumentType, TicketMetadata};

/// Number of characters kept by [`address`] from the street number onward.
pub const DEFAULT_ADDRESS_WINDOW: usize = 160;

/// Tunables for field extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Length, in characters, of the window captured by [`address`].
    pub address_window: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            address_window: DEFAULT_ADDRESS_WINDOW,
        }
    }
}

/// Ordered keyword rules for [`classify`]. The first rule with a keyword
/// present in the upper-cased text wins, so order matters when keywords
/// co-occur on the same page.
const CLASSIFICATION_RULES: &[(&[&str], DocumentType)] = &[
    (&["AUTORISATION", "AT N", "AT N°"], DocumentType::At),
    (&["PROCEDURE", "PROC", "ORDONNANCEMENT"], DocumentType::Proc),
    (&["PLAN", "PLANS"], DocumentType::Plan),
    (&["PHOTO", "PHOTOS"], DocumentType::Photo),
    (&["STREET"], DocumentType::Street),
];

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// First `BT` + 8 to 14 digits, upper-cased.
pub fn ticket_id(text: &str) -> Option<String> {
    static RE_TICKET: OnceLock<Regex> = OnceLock::new();
    let re = RE_TICKET.get_or_init(|| Regex::new(r"(?i)BT[0-9]{8,14}").unwrap());
    re.find(text).map(|m| m.as_str().to_uppercase())
}

/// First `AT` + at least 3 digits, upper-cased.
pub fn authorization_id(text: &str) -> Option<String> {
    static RE_AUTH: OnceLock<Regex> = OnceLock::new();
    let re = RE_AUTH.get_or_init(|| Regex::new(r"(?i)AT[0-9]{3,}").unwrap());
    re.find(text).map(|m| m.as_str().to_uppercase())
}

/// Classify a non-ticket page from keywords in its text.
pub fn classify(text: &str) -> DocumentType {
    let upper = text.to_uppercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| upper.contains(k)))
        .map(|(_, kind)| *kind)
        .unwrap_or(DocumentType::Doc)
}

// ---------------------------------------------------------------------------
// Ticket page fields
// ---------------------------------------------------------------------------

/// Text after a standalone `OBJET` label, up to the scheduled-date or
/// client-name label.
pub fn object(text: &str) -> Option<String> {
    static RE_LABEL: OnceLock<Regex> = OnceLock::new();
    static RE_END: OnceLock<Regex> = OnceLock::new();
    let label = RE_LABEL.get_or_init(|| Regex::new(r"(?i)(?-u:\b)OBJET(?-u:\b)\s*").unwrap());
    let end = RE_END.get_or_init(|| {
        Regex::new(r"(?i)(?-u:\b)DATE\s*PR[EÉ]VUE(?-u:\b)|(?-u:\b)NOM\s*CLIENT(?-u:\b)").unwrap()
    });

    let m = label.find(text)?;
    capture_until(text, m.end(), end)
}

/// `DD/MM/YYYY` token following a `DATE PRÉVUE` label.
pub fn scheduled_date(text: &str) -> Option<String> {
    static RE_DATE: OnceLock<Regex> = OnceLock::new();
    let re = RE_DATE.get_or_init(|| {
        Regex::new(r"(?i)(?-u:\b)DATE\s*PR[EÉ]VUE(?-u:\b)\s*([0-9]{2}/[0-9]{2}/[0-9]{4})").unwrap()
    });
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First `13h00 - 14h00` style slot, reformatted with a plain dash.
pub fn time_window(text: &str) -> Option<String> {
    static RE_SLOT: OnceLock<Regex> = OnceLock::new();
    let re = RE_SLOT.get_or_init(|| {
        Regex::new(r"(?i)(?-u:\b)([0-9]{1,2}h[0-9]{2})\s*[-–]\s*([0-9]{1,2}h[0-9]{2})(?-u:\b)").unwrap()
    });
    let caps = re.captures(text)?;
    Some(format!("{} - {}", &caps[1], &caps[2]))
}

/// Text after a `NOM CLIENT` label, up to a phone or address label or
/// something that looks like a street number.
pub fn client(text: &str) -> Option<String> {
    static RE_LABEL: OnceLock<Regex> = OnceLock::new();
    static RE_END: OnceLock<Regex> = OnceLock::new();
    let label =
        RE_LABEL.get_or_init(|| Regex::new(r"(?i)(?-u:\b)NOM\s*CLIENT(?-u:\b)\s*").unwrap());
    let end = RE_END.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)(?-u:\b)T[EÉ]L(?:[EÉ]PHONE)?(?-u:\b)",
            r"|(?-u:\b)ADRESSE(?-u:\b)",
            r"|(?-u:\b)[0-9]{1,4}\s",
        ))
        .unwrap()
    });

    let m = label.find(text)?;
    capture_until(text, m.end(), end)
}

/// Window of `window` characters starting at the first street number that
/// is eventually followed by a 5-digit postal code.
///
/// Over-captures on purpose: trailing noise after the city is kept rather
/// than risking a cut address.
pub fn address(text: &str, window: usize) -> Option<String> {
    static RE_ADDRESS: OnceLock<Regex> = OnceLock::new();
    let re = RE_ADDRESS.get_or_init(|| {
        Regex::new(r"(?s)(?-u:\b)[0-9]{1,4}\s+.+?(?-u:\b)[0-9]{5}(?-u:\b)").unwrap()
    });

    let m = re.find(text)?;
    let segment: String = text[m.start()..].chars().take(window).collect();
    non_empty(normalize(&segment))
}

/// Run every ticket-page extractor over one page.
pub fn extract_metadata(text: &str, options: &ExtractOptions) -> TicketMetadata {
    TicketMetadata {
        authorization_id: authorization_id(text),
        object: object(text),
        scheduled_date: scheduled_date(text),
        time_window: time_window(text),
        client: client(text),
        address: address(text, options.address_window),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Normalized text from `start` up to the first `end` match, or to the end.
///
/// The capture always holds at least one character, so a stop label sitting
/// right at `start` is part of the value rather than its end.
fn capture_until(text: &str, start: usize, end: &Regex) -> Option<String> {
    let first = text[start..].chars().next()?;
    let stop = end
        .find_at(text, start + first.len_utf8())
        .map(|m| m.start())
        .unwrap_or(text.len());
    non_empty(normalize(&text[start..stop]))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
