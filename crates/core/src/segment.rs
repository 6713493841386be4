//! Segmentation of a multi-ticket PDF into ticket blocks.
//!
//! Pages are walked in ascending order. A page carrying a ticket ID opens a
//! new [`TicketRecord`]; every following page without one is classified and
//! attached to the open record until the next ticket page. Pages seen before
//! the first ticket are front matter and are dropped.

use crate::day::resolve_day;
use crate::extract::{classify, extract_metadata, ticket_id, ExtractOptions};
use crate::source::PageSource;
use crate::text::assemble_page_text;
use crate::types::{DocumentType, ExtractionResult, PageEntry, TicketRecord};

/// Emitted once per page, before the page is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based page about to be analysed.
    pub page: u32,
    pub total: usize,
}

impl Progress {
    /// Completion in percent, clamped to `0..=100`.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.page as usize * 100) / self.total;
        pct.min(100) as u8
    }
}

/// Incremental page-by-page grouping state.
///
/// `tickets.last_mut()` is the open record; an empty list means no ticket
/// has been seen yet.
#[derive(Debug, Default)]
pub struct Segmenter {
    options: ExtractOptions,
    tickets: Vec<TicketRecord>,
    document_count: usize,
}

impl Segmenter {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Feed the normalized text of the next page.
    pub fn push_page(&mut self, page: u32, text: String) {
        if let Some(id) = ticket_id(&text) {
            log::debug!("page {page}: ticket {id} opened");
            let meta = extract_metadata(&text, &self.options);
            self.tickets.push(TicketRecord {
                id,
                meta,
                pages: vec![PageEntry {
                    page,
                    kind: DocumentType::Ticket,
                    text,
                }],
            });
            return;
        }

        match self.tickets.last_mut() {
            Some(current) => {
                let kind = classify(&text);
                log::debug!("page {page}: {kind} attached to {}", current.id);
                current.pages.push(PageEntry { page, kind, text });
                self.document_count += 1;
            }
            None => {
                log::debug!("page {page}: before first ticket, skipped");
            }
        }
    }

    /// Close the run and resolve its day from `file_name` and the records.
    pub fn finish(self, file_name: &str) -> ExtractionResult {
        let day = resolve_day(file_name, &self.tickets);
        ExtractionResult {
            tickets: self.tickets,
            document_count: self.document_count,
            day,
        }
    }
}

/// Group already-assembled page texts, given in ascending page order.
pub fn segment_pages<I>(pages: I, file_name: &str, options: &ExtractOptions) -> ExtractionResult
where
    I: IntoIterator<Item = (u32, String)>,
{
    let mut segmenter = Segmenter::new(*options);
    for (page, text) in pages {
        segmenter.push_page(page, text);
    }
    segmenter.finish(file_name)
}

/// Run a full extraction over `source`.
///
/// The first failing page read aborts the run and no partial result is
/// returned.
pub fn extract<S, F>(
    source: &S,
    file_name: &str,
    options: &ExtractOptions,
    mut on_progress: F,
) -> Result<ExtractionResult, S::Error>
where
    S: PageSource + ?Sized,
    F: FnMut(Progress),
{
    let total = source.page_count();
    let last = u32::try_from(total).unwrap_or(u32::MAX);
    let mut segmenter = Segmenter::new(*options);

    for page in 1..=last {
        on_progress(Progress { page, total });
        let fragments = source.page_fragments(page)?;
        segmenter.push_page(page, assemble_page_text(&fragments));
    }

    let result = segmenter.finish(file_name);
    log::debug!(
        "{file_name}: {} page(s), {} ticket(s), {} document page(s), day {:?}",
        total,
        result.tickets.len(),
        result.document_count,
        result.day
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextFragment;

    fn page(lines: &[&str]) -> Vec<TextFragment> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| TextFragment::new(*line, 72.0, 700.0 - (i as f32) * 20.0))
            .collect()
    }

    fn texts(pages: &[&str]) -> Vec<(u32, String)> {
        pages
            .iter()
            .enumerate()
            .map(|(i, t)| ((i as u32) + 1, t.to_string()))
            .collect()
    }

    struct FailingSource {
        pages: Vec<Vec<TextFragment>>,
        fail_on: u32,
    }

    impl PageSource for FailingSource {
        type Error = String;

        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>, String> {
            if page == self.fail_on {
                return Err(format!("page {page} is unreadable"));
            }
            Ok(self.pages[(page - 1) as usize].clone())
        }
    }

    // ============================================================================
    // Segmenter tests
    // ============================================================================

    #[test]
    fn test_single_ticket_with_plan_scenario() {
        let pages = vec![
            page(&["BON DE TRAVAIL", "BT20240307001", "DATE PREVUE 07/03/2024"]),
            page(&["PLAN DE SITUATION"]),
        ];
        let result = extract(
            pages.as_slice(),
            "JOURNEE_2024-03-07_site.pdf",
            &ExtractOptions::default(),
            |_| {},
        )
        .unwrap();

        assert_eq!(result.tickets.len(), 1);
        let ticket = &result.tickets[0];
        assert_eq!(ticket.id, "BT20240307001");
        let kinds: Vec<DocumentType> = ticket.pages.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![DocumentType::Ticket, DocumentType::Plan]);
        assert_eq!(ticket.pages[0].page, 1);
        assert_eq!(ticket.pages[1].page, 2);
        assert_eq!(result.document_count, 1);
        assert_eq!(result.day.as_deref(), Some("2024-03-07"));
    }

    #[test]
    fn test_front_matter_is_dropped_on_purpose() {
        // Pages before the first ticket are not attached anywhere and are not
        // counted as documents.
        let result = segment_pages(
            texts(&[
                "SOMMAIRE DE LA JOURNEE",
                "PLAN GENERAL",
                "BT20240307001 OBJET Pose",
                "PHOTO",
            ]),
            "day.pdf",
            &ExtractOptions::default(),
        );

        assert_eq!(result.tickets.len(), 1);
        let pages: Vec<u32> = result.tickets[0].pages.iter().map(|p| p.page).collect();
        assert_eq!(pages, vec![3, 4]);
        assert_eq!(result.document_count, 1);
    }

    #[test]
    fn test_record_count_matches_ticket_pages() {
        let input = texts(&[
            "BT11111111",
            "AUTORISATION AT1234",
            "BT22222222",
            "BT33333333",
            "STREET",
            "annexe",
        ]);
        let with_id = input.iter().filter(|(_, t)| ticket_id(t).is_some()).count();

        let result = segment_pages(input, "day.pdf", &ExtractOptions::default());

        assert_eq!(result.tickets.len(), with_id);
        assert_eq!(result.tickets.len(), 3);
        assert_eq!(result.document_count, 3);
        assert_eq!(result.tickets[0].pages[1].kind, DocumentType::At);
        assert_eq!(result.tickets[1].pages.len(), 1);
        let last: Vec<DocumentType> = result.tickets[2].pages.iter().map(|p| p.kind).collect();
        assert_eq!(
            last,
            vec![DocumentType::Ticket, DocumentType::Street, DocumentType::Doc]
        );
    }

    #[test]
    fn test_first_entry_is_always_the_ticket_page() {
        let result = segment_pages(
            texts(&["BT11111111", "PLAN", "BT22222222", "PHOTO"]),
            "day.pdf",
            &ExtractOptions::default(),
        );
        for ticket in &result.tickets {
            let first = ticket.ticket_page().unwrap();
            assert_eq!(first.kind, DocumentType::Ticket);
            assert_eq!(ticket_id(&first.text).as_deref(), Some(ticket.id.as_str()));
        }
    }

    #[test]
    fn test_ticket_metadata_comes_from_ticket_page_only() {
        let result = segment_pages(
            texts(&[
                "BT11111111 OBJET Raccordement NOM CLIENT MARTIN",
                "PROCEDURE NOM CLIENT AUTRE",
            ]),
            "day.pdf",
            &ExtractOptions::default(),
        );
        let meta = &result.tickets[0].meta;
        assert_eq!(meta.object.as_deref(), Some("Raccordement"));
        assert_eq!(meta.client.as_deref(), Some("MARTIN"));
    }

    #[test]
    fn test_zero_tickets() {
        let result = segment_pages(
            texts(&["PLAN", "PHOTO", "rien"]),
            "export.pdf",
            &ExtractOptions::default(),
        );
        assert!(result.tickets.is_empty());
        assert_eq!(result.document_count, 0);
        assert_eq!(result.day, None);
    }

    #[test]
    fn test_segmentation_is_idempotent() {
        let pages = vec![
            page(&["BT11111111", "OBJET Pose compteur", "DATE PREVUE 01/02/2024"]),
            page(&["PLAN"]),
            page(&["BT22222222", "13h00 - 14h00"]),
        ];
        let options = ExtractOptions::default();
        let first = extract(pages.as_slice(), "export.pdf", &options, |_| {}).unwrap();
        let second = extract(pages.as_slice(), "export.pdf", &options, |_| {}).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.day.as_deref(), Some("2024-02-01"));
    }

    // ============================================================================
    // extract tests
    // ============================================================================

    #[test]
    fn test_extract_reports_progress_per_page() {
        let pages = vec![page(&["BT11111111"]), page(&["PLAN"]), page(&["PHOTO"])];
        let mut seen = Vec::new();
        extract(pages.as_slice(), "x.pdf", &ExtractOptions::default(), |p| {
            seen.push((p.page, p.percent()))
        })
        .unwrap();
        assert_eq!(seen, vec![(1, 33), (2, 66), (3, 100)]);
    }

    #[test]
    fn test_extract_empty_document() {
        let pages: Vec<Vec<TextFragment>> = vec![];
        let result = extract(pages.as_slice(), "x.pdf", &ExtractOptions::default(), |_| {}).unwrap();
        assert_eq!(result, ExtractionResult::default());
    }

    #[test]
    fn test_extract_aborts_on_page_error() {
        let source = FailingSource {
            pages: vec![page(&["BT11111111"]), page(&["PLAN"]), page(&["PHOTO"])],
            fail_on: 2,
        };
        let err = extract(&source, "x.pdf", &ExtractOptions::default(), |_| {}).unwrap_err();
        assert_eq!(err, "page 2 is unreadable");
    }

    #[test]
    fn test_progress_percent_without_pages() {
        let p = Progress { page: 0, total: 0 };
        assert_eq!(p.percent(), 100);
    }
}
