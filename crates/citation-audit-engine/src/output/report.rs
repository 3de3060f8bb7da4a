use std::fmt::Write as _;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::analysis::{
    Analysis, ChapterCitations, ChapterReconciliation, ChapterStore, ChapterSummary,
    ReconciliationReport,
};
use crate::models::{CitationRecord, FootnoteRecord, QuotationRecord};

/// Missing entries listed per list in the console summary.
const CONSOLE_MISSING_LIMIT: usize = 10;

/// Label used in console output for records seen before any chapter heading.
const NO_CHAPTER: &str = "(before first chapter)";

/// One chapter of the serialized report.
#[derive(Debug, Serialize)]
pub struct ChapterReport<'a> {
    pub citations: &'a [CitationRecord],
    pub footnotes: &'a [FootnoteRecord],
    pub extracts: &'a [CitationRecord],
    pub references: &'a [CitationRecord],
    pub quotations: &'a [QuotationRecord],
    pub summary: ChapterSummary,
    pub missing_in_extracts: &'a [CitationRecord],
    pub missing_in_references: &'a [FootnoteRecord],
    pub unused_in_extracts: &'a [CitationRecord],
    pub unused_in_references: &'a [CitationRecord],
}

impl<'a> ChapterReport<'a> {
    fn new(
        citations: &'a ChapterCitations,
        reconciliation: Option<&'a ChapterReconciliation>,
    ) -> Self {
        let Some(r) = reconciliation else {
            return Self::unreconciled(citations);
        };
        Self {
            citations: &citations.main_text,
            footnotes: &citations.footnotes,
            extracts: &citations.extracts,
            references: &citations.references,
            quotations: &citations.quotations,
            summary: r.summary(),
            missing_in_extracts: &r.missing_in_extracts,
            missing_in_references: &r.missing_in_references,
            unused_in_extracts: &r.unused_in_extracts,
            unused_in_references: &r.unused_in_references,
        }
    }

    /// A chapter the report has no entry for: counts only, no cross-links.
    fn unreconciled(citations: &'a ChapterCitations) -> Self {
        Self {
            citations: &citations.main_text,
            footnotes: &citations.footnotes,
            extracts: &citations.extracts,
            references: &citations.references,
            quotations: &citations.quotations,
            summary: ChapterSummary {
                citations_in_text: citations.main_text.len(),
                citations_in_footnotes: citations.footnotes.len(),
                listings_in_extracts: citations.extracts.len(),
                listings_in_references: citations.references.len(),
                ..Default::default()
            },
            missing_in_extracts: &[],
            missing_in_references: &[],
            unused_in_extracts: &[],
            unused_in_references: &[],
        }
    }
}

/// The nested report document: chapter label to that chapter's lists,
/// summary counts and missing entries, in store order.
#[derive(Debug)]
pub struct ReportDocument<'a> {
    chapters: Vec<(&'a str, ChapterReport<'a>)>,
}

impl<'a> ReportDocument<'a> {
    pub fn new(store: &'a ChapterStore, report: &'a ReconciliationReport) -> Self {
        let chapters = store
            .chapters()
            .map(|(label, citations)| (label, ChapterReport::new(citations, report.chapter(label))))
            .collect();
        Self { chapters }
    }

    pub fn from_analysis(analysis: &'a Analysis) -> Self {
        Self::new(&analysis.store, &analysis.report)
    }

    pub fn chapter(&self, label: &str) -> Option<&ChapterReport<'a>> {
        self.chapters
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, c)| c)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ReportDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for (label, chapter) in &self.chapters {
            map.serialize_entry(label, chapter)?;
        }
        map.end()
    }
}

/// Plain-text summary: per-chapter counts, the first few missing and unused
/// entries of each list, then grand totals.
pub fn console_summary(report: &ReconciliationReport) -> String {
    let mut out = String::new();
    for (label, chapter) in report.chapters() {
        let label = if label.is_empty() { NO_CHAPTER } else { label };
        let _ = writeln!(out, "{label}");
        write_counts(&mut out, &chapter.summary());

        write_missing(
            &mut out,
            "Missing in extracts",
            chapter.missing_in_extracts.iter().map(describe_citation),
        );
        write_missing(
            &mut out,
            "Missing in references",
            chapter.missing_in_references.iter().map(describe_footnote),
        );
        write_missing(
            &mut out,
            "Unused in extracts",
            chapter.unused_in_extracts.iter().map(describe_citation),
        );
        write_missing(
            &mut out,
            "Unused in references",
            chapter.unused_in_references.iter().map(describe_citation),
        );
        out.push('\n');
    }

    let _ = writeln!(out, "Totals");
    write_counts(&mut out, &report.totals());
    out
}

fn write_counts(out: &mut String, s: &ChapterSummary) {
    let _ = writeln!(out, "  citations in text:      {}", s.citations_in_text);
    let _ = writeln!(out, "  citations in footnotes: {}", s.citations_in_footnotes);
    let _ = writeln!(out, "  listings in extracts:   {}", s.listings_in_extracts);
    let _ = writeln!(out, "  listings in references: {}", s.listings_in_references);
    let _ = writeln!(out, "  missing in extracts:    {}", s.missing_in_extracts);
    let _ = writeln!(out, "  missing in references:  {}", s.missing_in_references);
    let _ = writeln!(out, "  unused in extracts:     {}", s.unused_in_extracts);
    let _ = writeln!(out, "  unused in references:   {}", s.unused_in_references);
}

fn write_missing(out: &mut String, heading: &str, entries: impl ExactSizeIterator<Item = String>) {
    let total = entries.len();
    if total == 0 {
        return;
    }
    let _ = writeln!(out, "  {heading}:");
    for entry in entries.take(CONSOLE_MISSING_LIMIT) {
        let _ = writeln!(out, "    - {entry}");
    }
    if total > CONSOLE_MISSING_LIMIT {
        let _ = writeln!(out, "    ... and {} more", total - CONSOLE_MISSING_LIMIT);
    }
}

fn describe_citation(c: &CitationRecord) -> String {
    match &c.page {
        Some(page) => format!("{} ({}) {}, p. {page}", c.author, c.date, c.title),
        None => format!("{} ({}) {}", c.author, c.date, c.title),
    }
}

fn describe_footnote(f: &FootnoteRecord) -> String {
    match f.citation_fields() {
        Some((author, date, title)) => format!("[{}] {author} ({date}) {title}", f.id()),
        None => format!("[{}] (unparsed)", f.id()),
    }
}
