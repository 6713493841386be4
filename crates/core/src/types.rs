use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a page inside a ticket block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// The ticket page itself, the first page of every block.
    #[serde(rename = "BT")]
    Ticket,
    #[serde(rename = "AT")]
    At,
    #[serde(rename = "PROC")]
    Proc,
    #[serde(rename = "PLAN")]
    Plan,
    #[serde(rename = "PHOTO")]
    Photo,
    #[serde(rename = "STREET")]
    Street,
    #[serde(rename = "DOC")]
    Doc,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Ticket => "BT",
            DocumentType::At => "AT",
            DocumentType::Proc => "PROC",
            DocumentType::Plan => "PLAN",
            DocumentType::Photo => "PHOTO",
            DocumentType::Street => "STREET",
            DocumentType::Doc => "DOC",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One page of the source PDF attached to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    /// 1-based page number in the source PDF.
    pub page: u32,
    pub kind: DocumentType,
    /// Reconstructed, normalized page text.
    pub text: String,
}

/// Fields scraped from a ticket page. Every field is best effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMetadata {
    pub authorization_id: Option<String>,
    pub object: Option<String>,
    /// `DD/MM/YYYY`
    pub scheduled_date: Option<String>,
    /// `HHhMM - HHhMM`
    pub time_window: Option<String>,
    pub client: Option<String>,
    pub address: Option<String>,
}

impl TicketMetadata {
    pub fn is_empty(&self) -> bool {
        self.object.is_none()
            && self.scheduled_date.is_none()
            && self.time_window.is_none()
            && self.client.is_none()
            && self.address.is_none()
    }
}

/// A work ticket and the pages that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Upper-cased `BT` identifier.
    pub id: String,
    pub meta: TicketMetadata,
    /// The first entry is always the ticket page.
    pub pages: Vec<PageEntry>,
}

impl TicketRecord {
    /// The page that opened this record.
    pub fn ticket_page(&self) -> Option<&PageEntry> {
        self.pages.first()
    }
}

/// Output of one extraction run over one PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub tickets: Vec<TicketRecord>,
    /// Non-ticket pages across all tickets.
    pub document_count: usize,
    /// `YYYY-MM-DD`
    pub day: Option<String>,
}
