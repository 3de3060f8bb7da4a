use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Create a temporary directory for input and output files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Write a minimal `.docx` with styled paragraphs and footnotes.
///
/// Paragraphs are `(style id, text, referenced footnote id)`; footnotes are `(id, text)`.
pub fn write_test_docx(
    dir: &Path,
    filename: &str,
    paragraphs: &[(&str, &str, Option<&str>)],
    footnotes: &[(&str, &str)],
) -> PathBuf {
    let mut body = String::new();
    for (style, text, footnote) in paragraphs {
        body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r>"#,
            escape(text)
        ));
        if let Some(id) = footnote {
            body.push_str(&format!(r#"<w:r><w:footnoteReference w:id="{id}"/></w:r>"#));
        }
        body.push_str("</w:p>");
    }

    let mut notes = String::from(
        r#"<w:footnote w:type="separator" w:id="-1"><w:p><w:r><w:separator/></w:r></w:p></w:footnote>"#,
    );
    for (id, text) in footnotes {
        notes.push_str(&format!(
            r#"<w:footnote w:id="{id}"><w:p><w:pPr><w:pStyle w:val="FootnoteText"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p></w:footnote>"#,
            escape(text)
        ));
    }

    let parts = [
        (
            "word/document.xml",
            format!(r#"<w:document xmlns:w="{W_NS}"><w:body>{body}</w:body></w:document>"#),
        ),
        (
            "word/styles.xml",
            format!(
                r#"<w:styles xmlns:w="{W_NS}"><w:style w:styleId="Heading2"><w:name w:val="heading 2"/></w:style><w:style w:styleId="Heading3"><w:name w:val="heading 3"/></w:style><w:style w:styleId="FootnoteText"><w:name w:val="footnote text"/></w:style></w:styles>"#
            ),
        ),
        (
            "word/footnotes.xml",
            format!(r#"<w:footnotes xmlns:w="{W_NS}">{notes}</w:footnotes>"#),
        ),
    ];

    let path = dir.join(filename);
    let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in parts {
        zip.start_file(name, stored).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
