pub mod analysis;
pub mod io;
pub mod models;
pub mod output;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use analysis::{Analysis, AnalysisOptions, ChapterNumbering, QuoteTrigger, analyze};
pub use io::{DocumentError, read_document};
pub use models::*;
pub use output::{ReportDocument, console_summary, render_bibliography_markdown};
