use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::models::{CitationRecord, FootnoteRecord};

use super::store::{ChapterCitations, ChapterStore};

/// Count summary for one chapter. Every count is derived from a list length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChapterSummary {
    pub citations_in_text: usize,
    pub citations_in_footnotes: usize,
    pub listings_in_extracts: usize,
    pub missing_in_extracts: usize,
    pub listings_in_references: usize,
    pub missing_in_references: usize,
    pub unused_in_extracts: usize,
    pub unused_in_references: usize,
}

/// Missing cross-links found in one chapter, in both directions: citations
/// with no listing and listings no citation uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterReconciliation {
    pub citations_in_text: usize,
    pub citations_in_footnotes: usize,
    pub listings_in_extracts: usize,
    pub missing_in_extracts: Vec<CitationRecord>,
    pub listings_in_references: usize,
    pub missing_in_references: Vec<FootnoteRecord>,
    /// Extracts listings equal to no main-text citation.
    pub unused_in_extracts: Vec<CitationRecord>,
    /// References listings matched by no standard-format footnote.
    pub unused_in_references: Vec<CitationRecord>,
}

impl ChapterReconciliation {
    pub fn summary(&self) -> ChapterSummary {
        ChapterSummary {
            citations_in_text: self.citations_in_text,
            citations_in_footnotes: self.citations_in_footnotes,
            listings_in_extracts: self.listings_in_extracts,
            missing_in_extracts: self.missing_in_extracts.len(),
            listings_in_references: self.listings_in_references,
            missing_in_references: self.missing_in_references.len(),
            unused_in_extracts: self.unused_in_extracts.len(),
            unused_in_references: self.unused_in_references.len(),
        }
    }
}

/// Reconciliation results for every chapter, in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationReport {
    chapters: Vec<(String, ChapterReconciliation)>,
}

impl ReconciliationReport {
    pub fn chapter(&self, label: &str) -> Option<&ChapterReconciliation> {
        self.chapters
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, r)| r)
    }

    pub fn chapters(&self) -> impl Iterator<Item = (&str, &ChapterReconciliation)> {
        self.chapters.iter().map(|(l, r)| (l.as_str(), r))
    }

    /// Sum of every chapter's summary.
    pub fn totals(&self) -> ChapterSummary {
        self.chapters
            .iter()
            .map(|(_, r)| r.summary())
            .fold(ChapterSummary::default(), |acc, s| ChapterSummary {
                citations_in_text: acc.citations_in_text + s.citations_in_text,
                citations_in_footnotes: acc.citations_in_footnotes + s.citations_in_footnotes,
                listings_in_extracts: acc.listings_in_extracts + s.listings_in_extracts,
                missing_in_extracts: acc.missing_in_extracts + s.missing_in_extracts,
                listings_in_references: acc.listings_in_references + s.listings_in_references,
                missing_in_references: acc.missing_in_references + s.missing_in_references,
                unused_in_extracts: acc.unused_in_extracts + s.unused_in_extracts,
                unused_in_references: acc.unused_in_references + s.unused_in_references,
            })
    }
}

impl Serialize for ReconciliationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for (label, chapter) in &self.chapters {
            map.serialize_entry(label, chapter)?;
        }
        map.end()
    }
}

/// Compares main text against extracts and footnotes against references,
/// chapter by chapter, in both directions.
///
/// The `not_in_extracts`/`not_in_references` flags on stored records are
/// recomputed from scratch, so reconciling twice gives the same store.
pub fn reconcile(store: &mut ChapterStore) -> ReconciliationReport {
    let chapters = store
        .chapters_mut()
        .map(|(label, chapter)| (label.to_string(), reconcile_chapter(chapter)))
        .collect();
    ReconciliationReport { chapters }
}

fn reconcile_chapter(chapter: &mut ChapterCitations) -> ChapterReconciliation {
    let ChapterCitations {
        main_text,
        footnotes,
        extracts,
        references,
        ..
    } = chapter;

    let mut missing_in_extracts = Vec::new();
    for citation in main_text.iter_mut() {
        citation.not_in_extracts = !extracts.iter().any(|listed| listed.same_work(citation));
        if citation.not_in_extracts {
            missing_in_extracts.push(citation.clone());
        }
    }

    let mut missing_in_references = Vec::new();
    for footnote in footnotes.iter_mut().filter(|f| f.is_standard_format()) {
        let missing = !references.iter().any(|listed| footnote.matches_listing(listed));
        footnote.set_not_in_references(missing);
        if missing {
            missing_in_references.push(footnote.clone());
        }
    }

    let unused_in_extracts = extracts
        .iter()
        .filter(|listed| !main_text.iter().any(|citation| citation.same_work(listed)))
        .cloned()
        .collect();
    let unused_in_references = references
        .iter()
        .filter(|listed| !footnotes.iter().any(|footnote| footnote.matches_listing(listed)))
        .cloned()
        .collect();

    ChapterReconciliation {
        citations_in_text: main_text.len(),
        citations_in_footnotes: footnotes.len(),
        listings_in_extracts: extracts.len(),
        missing_in_extracts,
        listings_in_references: references.len(),
        missing_in_references,
        unused_in_extracts,
        unused_in_references,
    }
}
