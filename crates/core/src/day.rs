//! Resolution of the calendar day an import batch belongs to.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::TicketRecord;

/// `YYYY-MM-DD` (or `YYYY_MM_DD`) token in a file name, as ISO `YYYY-MM-DD`.
pub fn day_from_filename(name: &str) -> Option<String> {
    static RE_FILE_DAY: OnceLock<Regex> = OnceLock::new();
    let re = RE_FILE_DAY
        .get_or_init(|| Regex::new(r"([0-9]{4})[-_]([0-9]{2})[-_]([0-9]{2})").unwrap());
    let caps = re.captures(name)?;
    Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}

/// First `DD/MM/YYYY` token in `text`, as ISO `YYYY-MM-DD`.
pub fn day_from_text(text: &str) -> Option<String> {
    static RE_TEXT_DAY: OnceLock<Regex> = OnceLock::new();
    let re = RE_TEXT_DAY.get_or_init(|| {
        Regex::new(r"(?-u:\b)([0-9]{2})/([0-9]{2})/([0-9]{4})(?-u:\b)").unwrap()
    });
    let caps = re.captures(text)?;
    Some(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]))
}

/// The file name wins; otherwise the first page of the first ticket is
/// scanned for a date.
pub fn resolve_day(file_name: &str, tickets: &[TicketRecord]) -> Option<String> {
    day_from_filename(file_name).or_else(|| {
        tickets
            .first()
            .and_then(|t| t.ticket_page())
            .and_then(|p| day_from_text(&p.text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentType, PageEntry, TicketMetadata};

    fn ticket(id: &str, text: &str) -> TicketRecord {
        TicketRecord {
            id: id.to_string(),
            meta: TicketMetadata::default(),
            pages: vec![PageEntry {
                page: 1,
                kind: DocumentType::Ticket,
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn test_day_from_filename_dashes() {
        assert_eq!(
            day_from_filename("JOURNEE_2024-03-07_site.pdf"),
            Some("2024-03-07".to_string())
        );
    }

    #[test]
    fn test_day_from_filename_underscores() {
        assert_eq!(
            day_from_filename("journee_2024_11_30.pdf"),
            Some("2024-11-30".to_string())
        );
    }

    #[test]
    fn test_day_from_filename_missing() {
        assert_eq!(day_from_filename("planning.pdf"), None);
        assert_eq!(day_from_filename(""), None);
    }

    #[test]
    fn test_day_from_text_reorders_to_iso() {
        assert_eq!(
            day_from_text("DATE PREVUE 07/03/2024 13h00"),
            Some("2024-03-07".to_string())
        );
    }

    #[test]
    fn test_day_from_text_requires_two_digit_parts() {
        assert_eq!(day_from_text("7/3/2024"), None);
    }

    #[test]
    fn test_day_from_text_ascii_digits_and_boundaries() {
        assert_eq!(day_from_text("\u{0660}\u{0667}/03/2024"), None);
        assert_eq!(day_from_text("é07/03/2024"), Some("2024-03-07".to_string()));
    }

    #[test]
    fn test_day_from_filename_ascii_digits() {
        assert_eq!(day_from_filename("JOURNEE_\u{0662}024-03-07.pdf"), None);
    }

    #[test]
    fn test_resolve_day_filename_wins() {
        let tickets = vec![ticket("BT20240307001", "DATE PREVUE 07/03/2024")];
        assert_eq!(
            resolve_day("JOURNEE_2024-03-07.pdf", &tickets),
            Some("2024-03-07".to_string())
        );
        let conflicting = vec![ticket("BT20240307001", "DATE PREVUE 09/09/2025")];
        assert_eq!(
            resolve_day("JOURNEE_2024-03-07.pdf", &conflicting),
            Some("2024-03-07".to_string())
        );
    }

    #[test]
    fn test_resolve_day_falls_back_to_first_ticket_page() {
        let tickets = vec![
            ticket("BT20240307001", "DATE PREVUE 08/03/2024"),
            ticket("BT20240307002", "DATE PREVUE 01/01/2030"),
        ];
        assert_eq!(
            resolve_day("export.pdf", &tickets),
            Some("2024-03-08".to_string())
        );
    }

    #[test]
    fn test_resolve_day_unresolved() {
        assert_eq!(resolve_day("export.pdf", &[]), None);
        let tickets = vec![ticket("BT20240307001", "pas de date")];
        assert_eq!(resolve_day("export.pdf", &tickets), None);
    }
}
