// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use citation_audit_engine::{Block, DocumentModel, Footnote};

/// A book of `chapters` chapters, each with cited prose, a quotation,
/// footnoted citations and both listing sections.
#[allow(dead_code)]
pub fn generate_document(chapters: usize) -> DocumentModel {
    let mut blocks = Vec::new();
    let mut footnotes = Vec::new();

    for chapter in 1..=chapters {
        blocks.push(Block::heading2(format!("{chapter}. Chapter Title {chapter}")));
        blocks.push(Block::heading3("Overview"));
        for i in 0..20 {
            let year = 1900 + (chapter + i) % 120;
            let id = format!("{chapter}-{i}");
            blocks.push(
                Block::body(format!("Author{i} ({year}) Work number {i}, p. {i}."))
                    .with_footnote_ref(id.clone()),
            );
            footnotes.push(Footnote::new(id, format!("Author{i}, Work number {i} ({year}). Press.")));
        }
        blocks.push(Block::body("Some quoted material that runs on.").with_indent(36.0));
        blocks.push(Block::body("More of the same quotation.").with_indent(36.0));
        blocks.push(Block::body("Quoter (1999) The Source."));

        blocks.push(Block::heading3("Extracts"));
        for i in (0..20).step_by(2) {
            let year = 1900 + (chapter + i) % 120;
            blocks.push(Block::body(format!("Author{i} ({year}) Work number {i}. Press.")));
        }
        blocks.push(Block::heading3("References"));
        for i in (0..20).step_by(3) {
            let year = 1900 + (chapter + i) % 120;
            blocks.push(Block::body(format!("Author{i} ({year}) Work number {i}. Press.")));
        }
    }

    DocumentModel { blocks, footnotes }
}
