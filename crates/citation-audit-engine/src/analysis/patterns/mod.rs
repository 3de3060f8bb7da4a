//! # Citation Pattern Matching
//!
//! Zone-specific rule tables (see [`shapes`]) consumed by a single matcher.
//!
//! - **Main text**: one anchored shape; the whole block must be a citation.
//! - **Bibliography** (extracts and references): one unanchored shape.
//! - **Footnotes**: four shapes in priority order, with a verbatim fallback so
//!   that no footnote is ever lost.

pub mod shapes;

use crate::models::{CitationRecord, FootnoteRecord, HeadingContext, Zone};

pub use shapes::{AuthorForm, ShapeMatch, ShapeRule, ShapeSet, tables, trim_capture};

/// Applies the anchored main-text shape.
pub fn match_main_text(text: &str, context: &HeadingContext) -> Option<CitationRecord> {
    tables()
        .main_text
        .first_match(text)
        .map(|m| citation_from(m, Zone::MainText, context))
}

/// Applies the bibliography shape, recording the listing under `zone`.
pub fn match_listing(text: &str, zone: Zone, context: &HeadingContext) -> Option<CitationRecord> {
    tables()
        .bibliography
        .first_match(text)
        .map(|m| citation_from(m, zone, context))
}

/// Applies the footnote shapes; unmatched text is kept as a freeform record.
pub fn match_footnote(id: &str, text: &str) -> FootnoteRecord {
    match tables().footnote.first_match(text) {
        Some(m) => FootnoteRecord::Standard {
            id: id.to_string(),
            author: m.author,
            date: m.date,
            title: m.title,
            shape: m.shape,
            not_in_references: false,
        },
        None => FootnoteRecord::Freeform {
            id: id.to_string(),
            full_text: text.trim().to_string(),
        },
    }
}

fn citation_from(m: ShapeMatch, zone: Zone, context: &HeadingContext) -> CitationRecord {
    CitationRecord {
        author: m.author,
        date: m.date,
        title: m.title,
        page: m.page,
        zone,
        heading_context: context.clone(),
        shape: m.shape,
        not_in_extracts: false,
    }
}
