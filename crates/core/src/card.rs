//! View models for the ticket cards and the day header.
//!
//! Pure transformations of an [`ExtractionResult`]; the shell decides how to
//! draw them. Absent fields are left out of a card rather than shown empty.

use serde::Serialize;

use crate::types::{ExtractionResult, TicketRecord};
use crate::view::RenderRequest;

/// Shown in place of an unresolved day or an empty count.
pub const PLACEHOLDER: &str = "—";

const IMPORT_HINT: &str = "Charge un PDF “JOURNÉE_YYYY-MM-DD_…” puis lance l'extraction.";
const EMPTY_CARD_HINT: &str =
    "(Infos BT non détectées — tu peux quand même ouvrir les pages.)";

/// Header line for the loaded day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day: String,
    pub tickets: String,
    pub documents: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardField {
    pub label: &'static str,
    pub value: String,
}

/// A page button on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    /// e.g. `PLAN (p.4)`
    pub label: String,
    pub request: RenderRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub badges: Vec<String>,
    pub fields: Vec<CardField>,
    pub chips: Vec<Chip>,
    /// Set when no field could be extracted.
    pub hint: Option<String>,
}

pub fn day_summary(day: Option<&str>, result: Option<&ExtractionResult>) -> DaySummary {
    let day = day.unwrap_or(PLACEHOLDER).to_string();
    let ticket_count = result.map(|r| r.tickets.len()).unwrap_or(0);
    let document_count = result.map(|r| r.document_count).unwrap_or(0);

    let subtitle = if ticket_count > 0 {
        format!("Journée : {day} — {ticket_count} BT détecté(s)")
    } else {
        IMPORT_HINT.to_string()
    };

    DaySummary {
        day,
        tickets: count_or_placeholder(ticket_count),
        documents: count_or_placeholder(document_count),
        subtitle,
    }
}

pub fn cards(result: &ExtractionResult) -> Vec<Card> {
    result.tickets.iter().map(card).collect()
}

pub fn card(ticket: &TicketRecord) -> Card {
    let title = ticket.id.clone();
    let meta = &ticket.meta;

    let fields: Vec<CardField> = [
        ("OBJET", &meta.object),
        ("DATE", &meta.scheduled_date),
        ("HORAIRE", &meta.time_window),
        ("CLIENT", &meta.client),
        ("ADRESSE", &meta.address),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value.as_ref().map(|v| CardField {
            label,
            value: v.clone(),
        })
    })
    .collect();

    let mut badges = Vec::new();
    if let Some(at) = &meta.authorization_id {
        badges.push(at.clone());
    }
    badges.push(format!("{} page(s)", ticket.pages.len()));

    let chips = ticket
        .pages
        .iter()
        .map(|p| Chip {
            label: format!("{} (p.{})", p.kind, p.page),
            request: RenderRequest::new(p.page, title.clone()),
        })
        .collect();

    let hint = meta.is_empty().then(|| EMPTY_CARD_HINT.to_string());

    Card {
        title,
        badges,
        fields,
        chips,
        hint,
    }
}

fn count_or_placeholder(n: usize) -> String {
    if n == 0 {
        PLACEHOLDER.to_string()
    } else {
        n.to_string()
    }
}
