//! Core library for DEMAT-BT
//!
//! This crate implements the **Functional Core** of the DEMAT-BT technician
//! tool, following the Functional Core - Imperative Shell architectural
//! pattern.
//!
//! # Architecture Overview
//!
//! - **`dematbt_core`** (this crate): pure transformations over page text
//! - **`pdf`**: the PDF reader, turning bytes into positioned text per page
//! - **`dematbt`**: I/O, caching and terminal output (the Imperative Shell)
//!
//! The only seam towards the outside world is the [`source::PageSource`]
//! trait. Everything else is a deterministic function of its inputs and can
//! be tested with plain strings and fragment fixtures.
//!
//! # Pipeline
//!
//! ```text
//! fragments  ->  page text  ->  Segmenter  ->  ExtractionResult  ->  cards
//!   (per page)    assemble       ticket_id       resolve_day
//!                                classify
//!                                extract_metadata
//! ```
//!
//! # Module Organization
//!
//! - [`text`]: whitespace normalization and reading-order reconstruction
//! - [`extract`]: field extractors and the document-type classifier
//! - [`segment`]: grouping of pages into ticket blocks
//! - [`day`]: resolution of the batch day
//! - [`card`]: card and day-header view models
//! - [`session`]: the explicit extraction context
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use dematbt_core::{extract::ExtractOptions, segment::segment_pages};
//!
//! let pages = vec![
//!     (1, "BT20240307001 OBJET Remplacement compteur".to_string()),
//!     (2, "PLAN DE SITUATION".to_string()),
//! ];
//! let result = segment_pages(pages, "JOURNEE_2024-03-07.pdf", &ExtractOptions::default());
//!
//! assert_eq!(result.tickets.len(), 1);
//! assert_eq!(result.document_count, 1);
//! assert_eq!(result.day.as_deref(), Some("2024-03-07"));
//! ```

pub mod card;
pub mod day;
pub mod extract;
pub mod segment;
pub mod session;
pub mod source;
pub mod text;
pub mod types;
pub mod view;

pub use types::*;
