use std::collections::HashMap;

use crate::models::{Block, Footnote, HeadingContext, QuotationRecord, Zone};

use super::{
    AnalysisOptions,
    headings::{HeadingEvent, HeadingTracker},
    patterns::{match_footnote, match_listing, match_main_text},
    quotes::{QuotationAccumulator, QuoteStep},
    store::ChapterStore,
    zones::ZoneClassifier,
};

/// Walk-scoped state for one pass over the block stream.
///
/// Nothing here outlives the walk, so repeated runs over the same input are
/// independent of each other.
pub struct Walker<'a> {
    tracker: HeadingTracker,
    zones: ZoneClassifier,
    quotes: QuotationAccumulator,
    store: ChapterStore,
    /// Context at the first body reference to each footnote id.
    footnote_contexts: HashMap<String, HeadingContext>,
    /// A block held back to be consumed again (at most one).
    pushback: Option<&'a Block>,
}

impl<'a> Walker<'a> {
    pub fn new(options: &AnalysisOptions) -> Self {
        Self {
            tracker: HeadingTracker::new(options.chapter_numbering),
            zones: ZoneClassifier::new(),
            quotes: QuotationAccumulator::new(options.quote_trigger),
            store: ChapterStore::new(),
            footnote_contexts: HashMap::new(),
            pushback: None,
        }
    }

    /// Walks the body stream once.
    pub fn walk(&mut self, blocks: &'a [Block]) {
        let mut stream = blocks.iter();
        while let Some(block) = self.pushback.take().or_else(|| stream.next()) {
            self.consume(block);
        }
        if let Some(orphan) = self.quotes.interrupt() {
            log::debug!("End of stream inside a quotation; flushing as orphaned");
            self.store.append_quotation(orphan);
        }
    }

    /// Attributes every footnote to a chapter and matches it.
    ///
    /// A footnote goes to the context at its first body reference; footnotes
    /// never referenced go to whatever context is current now.
    pub fn attach_footnotes(&mut self, footnotes: &[Footnote]) {
        log::info!("Processing {} footnotes", footnotes.len());
        for footnote in footnotes {
            let text = footnote.text();
            if text.is_empty() {
                continue;
            }
            let chapter = match self.footnote_contexts.get(&footnote.id) {
                Some(context) => context.chapter.clone(),
                None => self.tracker.chapter().to_string(),
            };
            let record = match_footnote(&footnote.id, &text);
            log::debug!(
                "Footnote {} ({}) -> {chapter}",
                footnote.id,
                if record.is_standard_format() {
                    "standard"
                } else {
                    "freeform"
                }
            );
            self.store.append_footnote(&chapter, record);
        }

        for id in self.footnote_contexts.keys() {
            if !footnotes.iter().any(|f| &f.id == id) {
                log::warn!("Body references unknown footnote id {id}");
            }
        }
    }

    pub fn into_store(self) -> ChapterStore {
        self.store
    }

    fn consume(&mut self, block: &'a Block) {
        if block.is_blank() {
            return;
        }

        let zone = self.zones.classify(block);
        if zone == Zone::Heading {
            if self.quotes.is_collecting() {
                self.interrupt_quotation(block);
            } else {
                self.consume_heading(block);
            }
            return;
        }

        self.note_footnote_refs(block);
        self.tracker.note_content();

        match zone {
            Zone::MainText => self.consume_main_text(block),
            Zone::ExtractsBibliography | Zone::ReferencesBibliography => {
                match match_listing(&block.text, zone, self.tracker.context()) {
                    Some(listing) => self.store.append_citation(listing),
                    None => log::debug!("Unmatched {zone:?} entry: {}", block.text.trim()),
                }
            }
            Zone::Footnote => {
                let record = match_footnote("", &block.text);
                let chapter = self.tracker.chapter().to_string();
                self.store.append_footnote(&chapter, record);
            }
            Zone::Heading => {}
        }
    }

    fn consume_heading(&mut self, block: &Block) {
        let event = self.tracker.observe(block);
        if let HeadingEvent::ZoneMarker(marker) = &event {
            log::debug!("Entering {marker:?} listing in {}", self.tracker.chapter());
        }
        self.zones.apply(&event);
    }

    fn consume_main_text(&mut self, block: &Block) {
        match self.quotes.offer(block, self.tracker.context()) {
            QuoteStep::Citation(citation) => {
                log::debug!("Citation: {} ({})", citation.author, citation.date);
                self.store.append_citation(citation);
            }
            QuoteStep::Closed(quotation) => {
                log::debug!("Quotation attributed to {}", quotation.author);
                self.store.append_quotation(quotation);
            }
            QuoteStep::Accumulated => {}
            QuoteStep::Skipped => log::trace!("Skipped: {}", block.text.trim()),
        }
    }

    /// A heading arrived while a quotation was open: flush the quotation as
    /// orphaned, then either take the heading as an orphaned attribution or
    /// push it back for ordinary heading processing.
    fn interrupt_quotation(&mut self, block: &'a Block) {
        if let Some(orphan) = self.quotes.interrupt() {
            self.store.append_quotation(orphan);
        }
        match match_main_text(&block.text, self.tracker.context()) {
            Some(citation) => {
                log::debug!("Orphaned attribution: {}", block.text.trim());
                self.store
                    .append_quotation(QuotationRecord::orphaned_attribution(citation));
            }
            None => self.pushback = Some(block),
        }
    }

    fn note_footnote_refs(&mut self, block: &Block) {
        for id in &block.footnote_refs {
            if !self.footnote_contexts.contains_key(id) {
                self.footnote_contexts
                    .insert(id.clone(), self.tracker.snapshot());
            }
        }
    }
}
