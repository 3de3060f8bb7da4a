pub mod block;
pub mod records;

pub use block::{Block, DocumentModel, Footnote, StyleTag};
pub use records::{
    CitationKey, CitationRecord, FootnoteRecord, HeadingContext, ORPHANED_ATTRIBUTION_TEXT,
    ORPHANED_QUOTE_TITLE, QuotationRecord, Zone,
};
