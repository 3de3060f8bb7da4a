//! # Citation Analysis
//!
//! A single sequential walk over the document's blocks followed by a
//! per-chapter reconciliation.
//!
//! ## Phases
//!
//! 1. **Walk** (`walker`): every body block is consumed exactly once, by heading
//!    processing, citation matching or quotation accumulation
//!
//! 2. **Footnote pass** (`walker`): footnotes are matched and attributed to the
//!    chapter in which they were first referenced
//!
//! 3. **Reconciliation** (`reconcile`): main-text citations are checked against
//!    extracts and standard footnotes against references
//!
//! ## Modules
//!
//! - **`headings`**: `HeadingTracker` maintains the chapter/section context
//! - **`zones`**: `ZoneClassifier` decides main text, footnote or bibliography
//! - **`patterns`**: declarative citation shapes and the per-zone matcher
//! - **`quotes`**: `QuotationAccumulator` merges quotation runs with their attribution
//! - **`store`**: `ChapterStore` per-chapter record lists
//! - **`reconcile`**: missing-listing detection and summary counts
//!
//! ## Key Invariants
//!
//! - All walk state is owned by one `Walker`; nothing persists between runs
//! - Summary counts are derived from list lengths
//! - Reconciliation uses exact field equality with no normalisation

pub mod headings;
pub mod patterns;
pub mod quotes;
pub mod reconcile;
pub mod store;
pub mod walker;
pub mod zones;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::models::DocumentModel;

pub use headings::{ChapterNumbering, HeadingEvent, HeadingTracker, ZoneMarker};
pub use patterns::{match_footnote, match_listing, match_main_text};
pub use quotes::{QuotationAccumulator, QuoteStep, QuoteTrigger};
pub use reconcile::{ChapterReconciliation, ChapterSummary, ReconciliationReport, reconcile};
pub use store::{ChapterCitations, ChapterStore, StoreRecord};
pub use walker::Walker;
pub use zones::ZoneClassifier;

/// Policies for the two ambiguous parts of the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub chapter_numbering: ChapterNumbering,
    pub quote_trigger: QuoteTrigger,
}

/// The populated store together with its reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub store: ChapterStore,
    pub report: ReconciliationReport,
}

/// Runs the walk, the footnote pass and reconciliation over `document`.
pub fn analyze(document: &DocumentModel, options: &AnalysisOptions) -> Analysis {
    log::info!(
        "Analysing {} blocks and {} footnotes",
        document.blocks.len(),
        document.footnotes.len()
    );
    let mut walker = Walker::new(options);
    walker.walk(&document.blocks);
    walker.attach_footnotes(&document.footnotes);

    let mut store = walker.into_store();
    let report = reconcile(&mut store);
    log::info!("Reconciled {} chapters", store.len());
    Analysis { store, report }
}
