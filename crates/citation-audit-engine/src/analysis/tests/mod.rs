//! Behaviour tests for the whole walk: block stream in, store and report out.


use pretty_assertions::assert_eq;

use crate::analysis::{AnalysisOptions, ChapterNumbering, QuoteTrigger, analyze};
use crate::models::{
    Block, DocumentModel, Footnote, FootnoteRecord, ORPHANED_ATTRIBUTION_TEXT, StyleTag,
};

fn run(blocks: Vec<Block>) -> crate::analysis::Analysis {
    run_with(DocumentModel::from_blocks(blocks), AnalysisOptions::default())
}

fn run_with(document: DocumentModel, options: AnalysisOptions) -> crate::analysis::Analysis {
    let analysis = analyze(&document, &options);
    invariants::check(&analysis);
    analysis
}

#[test]
fn chapter_boundary_separates_reconciliation() {
    let analysis = run(vec![
        Block::heading2("1. Intro"),
        Block::body("Smith (2019) Title."),
        Block::heading2("2. Next"),
        Block::heading3("extracts"),
        Block::body("Smith (2019) Title."),
    ]);

    let intro = analysis.store.chapter("Chapter 1: Intro").unwrap();
    assert_eq!(intro.main_text.len(), 1);
    assert!(intro.extracts.is_empty());

    let next = analysis.store.chapter("Chapter 2: Next").unwrap();
    assert!(next.main_text.is_empty());
    assert_eq!(next.extracts.len(), 1);

    let report = analysis.report.chapter("Chapter 1: Intro").unwrap();
    assert_eq!(report.missing_in_extracts.len(), 1);
}

#[test]
fn identical_citation_in_extracts_is_found() {
    let citation = "Smith, J. (2020) A Theory of Systems.";
    let analysis = run(vec![
        Block::heading2("1. Systems"),
        Block::body(citation),
        Block::heading3("Extracts"),
        Block::body(citation),
    ]);

    let chapter = analysis.report.chapter("Chapter 1: Systems").unwrap();
    assert_eq!(chapter.citations_in_text, 1);
    assert_eq!(chapter.listings_in_extracts, 1);
    assert!(chapter.missing_in_extracts.is_empty());
}

#[test]
fn page_suffix_difference_is_missing() {
    let analysis = run(vec![
        Block::heading2("1. Systems"),
        Block::body("Smith (2019) Title, p. 12."),
        Block::heading3("Extracts"),
        Block::body("Smith (2019) Title."),
    ]);

    let chapter = analysis.report.chapter("Chapter 1: Systems").unwrap();
    assert_eq!(chapter.missing_in_extracts.len(), 1);
    assert_eq!(chapter.missing_in_extracts[0].page.as_deref(), Some("12"));
}

#[test]
fn trailing_period_difference_is_missing() {
    // The listing lacks the period that closes its title, so it is not a listing.
    let analysis = run(vec![
        Block::heading2("1. Systems"),
        Block::body("Smith (2019) Title."),
        Block::heading3("Extracts"),
        Block::body("Smith (2019) Title"),
    ]);

    let chapter = analysis.report.chapter("Chapter 1: Systems").unwrap();
    assert_eq!(chapter.listings_in_extracts, 0);
    assert_eq!(chapter.missing_in_extracts.len(), 1);
    assert!(analysis.store.chapter("Chapter 1: Systems").unwrap().main_text[0].not_in_extracts);
}

#[test]
fn extracts_listing_nothing_cites_is_unused() {
    let analysis = run(vec![
        Block::heading2("1. Systems"),
        Block::body("Smith (2019) Title."),
        Block::heading3("Extracts"),
        Block::body("Smith (2019) Title."),
        Block::body("Brown (2005) Shelf Only. Verso."),
    ]);

    let chapter = analysis.report.chapter("Chapter 1: Systems").unwrap();
    assert!(chapter.missing_in_extracts.is_empty());
    assert_eq!(chapter.unused_in_extracts.len(), 1);
    assert_eq!(chapter.unused_in_extracts[0].author, "Brown");
    assert_eq!(chapter.unused_in_extracts[0].title, "Shelf Only");
    assert_eq!(chapter.summary().unused_in_extracts, 1);
}

#[test]
fn references_listing_no_footnote_cites_is_unused() {
    let document = DocumentModel {
        blocks: vec![
            Block::heading2("1. Notes"),
            Block::body("Smith (2019) Title.").with_footnote_ref("1"),
            Block::heading3("References"),
            Block::body("Smith (2019) Title. Penguin."),
            Block::body("Lee (2001) Unused Work. Verso."),
        ],
        footnotes: vec![Footnote::new("1", "Smith, Title (2019). Penguin.")],
    };
    let analysis = run_with(document, AnalysisOptions::default());

    let chapter = analysis.report.chapter("Chapter 1: Notes").unwrap();
    assert!(chapter.missing_in_references.is_empty());
    assert_eq!(chapter.unused_in_references.len(), 1);
    assert_eq!(chapter.unused_in_references[0].author, "Lee");
    assert!(chapter.unused_in_extracts.is_empty());
}

#[test]
fn quotation_closes_on_attribution() {
    let analysis = run(vec![
        Block::heading2("1. Quotes"),
        Block::body("indented line one.").with_indent(36.0),
        Block::body("indented line two.").with_indent(36.0),
        Block::body("Jones (2018) On Quoting."),
    ]);

    let chapter = analysis.store.chapter("Chapter 1: Quotes").unwrap();
    assert_eq!(chapter.quotations.len(), 1);
    let quote = &chapter.quotations[0];
    assert_eq!(quote.quote_text, "indented line one.\nindented line two.");
    assert_eq!(
        (quote.author.as_str(), quote.date.as_str(), quote.title.as_str()),
        ("Jones", "2018", "On Quoting")
    );
    assert!(chapter.main_text.is_empty());
}

#[test]
fn trailing_quotation_is_flushed_as_orphan() {
    let analysis = run(vec![
        Block::heading2("1. Quotes"),
        Block::body("Smith (2019) Title."),
        Block::body("a closing quotation.").with_indent(36.0),
    ]);

    let chapter = analysis.store.chapter("Chapter 1: Quotes").unwrap();
    assert_eq!(chapter.quotations.len(), 1);
    let orphan = &chapter.quotations[0];
    assert!(orphan.is_orphaned_quote());
    assert_eq!(orphan.author, "");
    assert_eq!(orphan.date, "");
    assert_eq!(orphan.quote_text, "a closing quotation.");
}

#[test]
fn heading_shaped_attribution_after_quote_is_orphaned() {
    let analysis = run(vec![
        Block::heading2("1. Quotes"),
        Block::body("a quotation.").with_indent(36.0),
        Block::heading4("Jones (2018) On Quoting."),
        Block::body("Smith (2019) Title."),
    ]);

    let chapter = analysis.store.chapter("Chapter 1: Quotes").unwrap();
    assert_eq!(chapter.quotations.len(), 2);
    assert!(chapter.quotations[0].is_orphaned_quote());
    assert!(chapter.quotations[1].is_orphaned_attribution());
    assert_eq!(chapter.quotations[1].quote_text, ORPHANED_ATTRIBUTION_TEXT);
    assert_eq!(chapter.quotations[1].author, "Jones");
    // The attribution heading was consumed, so it never became a section label.
    assert_eq!(chapter.main_text[0].heading_context.heading4, "");
}

#[test]
fn interrupting_heading_is_still_processed() {
    let analysis = run(vec![
        Block::heading2("1. Quotes"),
        Block::body("a quotation."),
        Block::heading2("2. After"),
        Block::body("Smith (2019) Title."),
    ]);

    let first = analysis.store.chapter("Chapter 1: Quotes").unwrap();
    assert_eq!(first.quotations.len(), 1);
    assert!(first.quotations[0].is_orphaned_quote());

    let second = analysis.store.chapter("Chapter 2: After").unwrap();
    assert_eq!(second.main_text.len(), 1);
}

#[test]
fn zone_marker_interrupts_quotation() {
    let analysis = run(vec![
        Block::heading2("1. Quotes"),
        Block::body("a quotation."),
        Block::heading3("Extracts"),
        Block::body("Smith (2019) Title."),
    ]);

    let chapter = analysis.store.chapter("Chapter 1: Quotes").unwrap();
    assert_eq!(chapter.quotations.len(), 1);
    assert_eq!(chapter.extracts.len(), 1);
}

#[test]
fn unmatched_footnote_is_counted_but_never_missing() {
    let document = DocumentModel {
        blocks: vec![
            Block::heading2("1. Notes"),
            Block::body("Smith (2019) Title.").with_footnote_ref("1"),
        ],
        footnotes: vec![Footnote::new("1", "See the discussion in the previous chapter")],
    };
    let analysis = run_with(document, AnalysisOptions::default());

    let chapter = analysis.store.chapter("Chapter 1: Notes").unwrap();
    assert_eq!(chapter.footnotes.len(), 1);
    assert!(!chapter.footnotes[0].is_standard_format());

    let report = analysis.report.chapter("Chapter 1: Notes").unwrap();
    assert_eq!(report.citations_in_footnotes, 1);
    assert!(report.missing_in_references.is_empty());
}

#[test]
fn footnotes_follow_their_first_reference() {
    let document = DocumentModel {
        blocks: vec![
            Block::heading2("1. First"),
            Block::body("Smith (2019) Title.").with_footnote_ref("1"),
            Block::heading3("References"),
            Block::body("Smith (2019) A Theory. Penguin."),
            Block::heading2("2. Second"),
            Block::body("Jones (2018) Other.").with_footnote_ref("1"),
        ],
        footnotes: vec![
            Footnote::new("1", "Smith, A Theory (2019). Penguin."),
            Footnote::new("2", "Jones, Unreferenced Work 2018."),
        ],
    };
    let analysis = run_with(document, AnalysisOptions::default());

    let first = analysis.store.chapter("Chapter 1: First").unwrap();
    assert_eq!(first.footnotes.len(), 1);
    assert_eq!(first.footnotes[0].id(), "1");
    assert!(analysis.report.chapter("Chapter 1: First").unwrap().missing_in_references.is_empty());

    // Never referenced: attributed to the context current at the footnote pass.
    let second = analysis.store.chapter("Chapter 2: Second").unwrap();
    assert_eq!(second.footnotes.len(), 1);
    assert_eq!(second.footnotes[0].id(), "2");
    assert!(matches!(
        &second.footnotes[0],
        FootnoteRecord::Standard { not_in_references: true, .. }
    ));
}

#[test]
fn footnote_styled_body_block_is_stored_in_current_chapter() {
    let analysis = run(vec![
        Block::heading2("1. Inline"),
        Block::new(StyleTag::FootnoteBody, "Smith, A Theory (2019). Penguin."),
    ]);

    let chapter = analysis.store.chapter("Chapter 1: Inline").unwrap();
    assert_eq!(chapter.footnotes.len(), 1);
    assert!(chapter.footnotes[0].is_standard_format());
    assert!(chapter.quotations.is_empty());
}

#[test]
fn citations_before_any_chapter_use_empty_label() {
    let analysis = run(vec![Block::body("Smith (2019) Title.")]);
    assert_eq!(analysis.store.labels().collect::<Vec<_>>(), vec![""]);
}

#[test]
fn blank_blocks_are_ignored() {
    let analysis = run(vec![
        Block::heading2("1. Quotes"),
        Block::body("a quotation."),
        Block::body("   "),
        Block::body("Jones (2018) On Quoting."),
    ]);

    let chapter = analysis.store.chapter("Chapter 1: Quotes").unwrap();
    assert_eq!(chapter.quotations.len(), 1);
    assert_eq!(chapter.quotations[0].quote_text, "a quotation.");
}

#[test]
fn indented_trigger_leaves_prose_out_of_quotations() {
    let options = AnalysisOptions {
        quote_trigger: QuoteTrigger::Indented,
        ..Default::default()
    };
    let document = DocumentModel::from_blocks(vec![
        Block::heading2("1. Prose"),
        Block::body("An ordinary paragraph of prose."),
        Block::body("Smith (2019) Title."),
    ]);
    let analysis = run_with(document, options);

    let chapter = analysis.store.chapter("Chapter 1: Prose").unwrap();
    assert!(chapter.quotations.is_empty());
    assert_eq!(chapter.main_text.len(), 1);
}

#[test]
fn legacy_bibliography_heading_closes_chapters() {
    let options = AnalysisOptions {
        chapter_numbering: ChapterNumbering::LegacyBibliography,
        ..Default::default()
    };
    let document = DocumentModel::from_blocks(vec![
        Block::heading2("1. Intro"),
        Block::body("Smith (2019) Title."),
        Block::heading3("Bibliography"),
        Block::body("Jones (2018) Other."),
    ]);
    let analysis = run_with(document, options);

    assert_eq!(
        analysis.store.labels().collect::<Vec<_>>(),
        vec!["Chapter 1: Start", "Chapter 2: Next Chapter"]
    );
    let start = analysis.store.chapter("Chapter 1: Start").unwrap();
    assert_eq!(start.main_text[0].heading_context.heading2, "1: Intro");
}

#[test]
fn legacy_mode_keeps_heading2_for_unnumbered_headings() {
    let options = AnalysisOptions {
        chapter_numbering: ChapterNumbering::LegacyBibliography,
        ..Default::default()
    };
    let document = DocumentModel::from_blocks(vec![
        Block::heading2("1. Intro"),
        Block::heading2("Interlude"),
        Block::body("Smith (2019) Title."),
    ]);
    let analysis = run_with(document, options);

    let start = analysis.store.chapter("Chapter 1: Start").unwrap();
    assert_eq!(start.main_text[0].heading_context.heading2, "1: Intro");
}

#[test]
fn largest_chapter_number_does_not_overflow() {
    let analysis = run(vec![
        Block::heading2("4294967295. Last"),
        Block::heading2("Interlude"),
        Block::body("Smith (2019) Title."),
    ]);

    assert_eq!(
        analysis.store.labels().collect::<Vec<_>>(),
        vec!["Chapter 4294967295: Interlude"]
    );
}

#[test]
fn both_triggers_collapse_pending_synthetic_chapter() {
    let options = AnalysisOptions {
        chapter_numbering: ChapterNumbering::Both,
        ..Default::default()
    };
    let document = DocumentModel::from_blocks(vec![
        Block::heading2("Opening"),
        Block::body("Smith (2019) Title."),
        Block::heading3("Bibliography"),
        Block::heading2("Closing"),
        Block::body("Jones (2018) Other."),
    ]);
    let analysis = run_with(document, options);

    assert_eq!(
        analysis.store.labels().collect::<Vec<_>>(),
        vec!["Chapter 1: Opening", "Chapter 2: Closing"]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let document = DocumentModel {
        blocks: vec![
            Block::heading2("Unnumbered"),
            Block::body("Smith (2019) Title.").with_footnote_ref("1"),
            Block::body("a quotation."),
            Block::body("Jones (2018) On Quoting."),
            Block::heading3("Extracts"),
            Block::body("Smith (2019) Title. Penguin."),
        ],
        footnotes: vec![Footnote::new("1", "Smith, Title (2019). Penguin.")],
    };
    let options = AnalysisOptions::default();

    let first = analyze(&document, &options);
    let second = analyze(&document, &options);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.store).unwrap(),
        serde_json::to_string(&second.store).unwrap()
    );
    assert_eq!(
        first.store.labels().collect::<Vec<_>>(),
        vec!["Chapter 1: Unnumbered"]
    );
}
