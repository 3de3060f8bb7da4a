//! Rendering of analysis results: the nested JSON report, the console
//! summary and the per-chapter Markdown bibliography.

pub mod bibliography;
pub mod format;
pub mod report;

pub use bibliography::{BibliographyEntry, bibliography_entries};
pub use format::{capitalize_title, format_citation, render_bibliography_markdown};
pub use report::{ChapterReport, ReportDocument, console_summary};
