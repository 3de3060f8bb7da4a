use crate::analysis::ChapterCitations;
use crate::models::{CitationRecord, FootnoteRecord};

/// One distinct work cited or listed in a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibliographyEntry {
    pub author: String,
    pub date: String,
    pub title: String,
    pub page: Option<String>,
}

impl BibliographyEntry {
    /// Last whitespace-delimited token of the author string.
    pub fn sort_key(&self) -> &str {
        self.author.split_whitespace().last().unwrap_or("")
    }
}

impl From<&CitationRecord> for BibliographyEntry {
    fn from(c: &CitationRecord) -> Self {
        Self {
            author: c.author.clone(),
            date: c.date.clone(),
            title: c.title.clone(),
            page: c.page.clone(),
        }
    }
}

impl BibliographyEntry {
    fn from_footnote(f: &FootnoteRecord) -> Option<Self> {
        let (author, date, title) = f.citation_fields()?;
        Some(Self {
            author: author.to_string(),
            date: date.to_string(),
            title: title.to_string(),
            page: None,
        })
    }
}

/// Distinct works of a chapter: extracts, then main text, then standard
/// footnotes, deduplicated by exact value and stably sorted by [`BibliographyEntry::sort_key`].
pub fn bibliography_entries(chapter: &ChapterCitations) -> Vec<BibliographyEntry> {
    let candidates = chapter
        .extracts
        .iter()
        .chain(&chapter.main_text)
        .map(BibliographyEntry::from)
        .chain(chapter.footnotes.iter().filter_map(BibliographyEntry::from_footnote));

    let mut entries: Vec<BibliographyEntry> = Vec::new();
    for entry in candidates {
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    entries.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
    entries
}
