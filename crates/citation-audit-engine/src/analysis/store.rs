use std::collections::HashMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::models::{CitationRecord, FootnoteRecord, QuotationRecord, Zone};

/// Everything collected for one chapter, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChapterCitations {
    pub main_text: Vec<CitationRecord>,
    pub footnotes: Vec<FootnoteRecord>,
    pub extracts: Vec<CitationRecord>,
    pub references: Vec<CitationRecord>,
    pub quotations: Vec<QuotationRecord>,
}

impl ChapterCitations {
    pub fn standard_footnotes(&self) -> impl Iterator<Item = &FootnoteRecord> {
        self.footnotes.iter().filter(|f| f.is_standard_format())
    }

    pub fn is_empty(&self) -> bool {
        self.main_text.is_empty()
            && self.footnotes.is_empty()
            && self.extracts.is_empty()
            && self.references.is_empty()
            && self.quotations.is_empty()
    }
}

/// One record routed to a chapter list.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRecord {
    Citation(CitationRecord),
    Footnote(FootnoteRecord),
    Quotation(QuotationRecord),
}

/// Per-chapter citation collections keyed by chapter label.
///
/// Chapters keep the order in which something was first appended to them.
/// Appends never deduplicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterStore {
    chapters: Vec<(String, ChapterCitations)>,
    index: HashMap<String, usize>,
}

impl ChapterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` to `chapter`'s list for `zone`.
    ///
    /// Citations go to `main_text`, `extracts` or `references` by zone and
    /// are dropped with a warning under any other zone. Footnotes and
    /// quotations have one list each.
    pub fn append(&mut self, chapter: &str, zone: Zone, record: StoreRecord) {
        match record {
            StoreRecord::Citation(citation) => match zone {
                Zone::MainText => self.entry(chapter).main_text.push(citation),
                Zone::ExtractsBibliography => self.entry(chapter).extracts.push(citation),
                Zone::ReferencesBibliography => self.entry(chapter).references.push(citation),
                Zone::Footnote | Zone::Heading => {
                    log::warn!("Dropping citation filed under {zone:?} in {chapter}");
                }
            },
            StoreRecord::Footnote(footnote) => self.entry(chapter).footnotes.push(footnote),
            StoreRecord::Quotation(quotation) => self.entry(chapter).quotations.push(quotation),
        }
    }

    /// Appends a citation under the chapter and zone it was captured in.
    pub fn append_citation(&mut self, citation: CitationRecord) {
        let chapter = citation.heading_context.chapter.clone();
        let zone = citation.zone;
        self.append(&chapter, zone, StoreRecord::Citation(citation));
    }

    pub fn append_footnote(&mut self, chapter: &str, footnote: FootnoteRecord) {
        self.append(chapter, Zone::Footnote, StoreRecord::Footnote(footnote));
    }

    pub fn append_quotation(&mut self, quotation: QuotationRecord) {
        let chapter = quotation.heading_context.chapter.clone();
        self.append(&chapter, Zone::MainText, StoreRecord::Quotation(quotation));
    }

    pub fn chapter(&self, label: &str) -> Option<&ChapterCitations> {
        self.index.get(label).map(|&i| &self.chapters[i].1)
    }

    pub fn chapters(&self) -> impl Iterator<Item = (&str, &ChapterCitations)> {
        self.chapters.iter().map(|(label, c)| (label.as_str(), c))
    }

    pub(crate) fn chapters_mut(&mut self) -> impl Iterator<Item = (&str, &mut ChapterCitations)> {
        self.chapters.iter_mut().map(|(label, c)| (label.as_str(), c))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.chapters.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    fn entry(&mut self, chapter: &str) -> &mut ChapterCitations {
        let i = match self.index.get(chapter) {
            Some(&i) => i,
            None => {
                self.chapters
                    .push((chapter.to_string(), ChapterCitations::default()));
                self.index.insert(chapter.to_string(), self.chapters.len() - 1);
                self.chapters.len() - 1
            }
        };
        &mut self.chapters[i].1
    }
}

impl Serialize for ChapterStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for (label, chapter) in &self.chapters {
            map.serialize_entry(label, chapter)?;
        }
        map.end()
    }
}
