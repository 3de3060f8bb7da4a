use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;

use crate::analysis::ChapterStore;

use super::bibliography::{BibliographyEntry, bibliography_entries};

/// Words kept lowercase in titles unless they come first.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "for", "nor", "on", "at", "to", "from", "by", "in",
    "of",
];

/// Section title for records collected before the first chapter heading.
const FRONT_MATTER: &str = "Front Matter";

/// Title-cases a title: the first word and every word longer than three
/// characters that is not a function word are capitalised, the rest lowercased.
pub fn capitalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            let keep_low = bare.chars().count() <= 3 || FUNCTION_WORDS.contains(&bare.as_str());
            if i == 0 || !keep_low {
                capitalize_word(word)
            } else {
                word.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercases the first letter and lowercases the rest. Leading quote marks
/// and brackets are skipped.
fn capitalize_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut done = false;
    for c in word.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// `author. year. Capitalized Title.` without doubled periods.
pub fn format_citation(entry: &BibliographyEntry) -> String {
    let title = capitalize_title(&entry.title);
    let parts = [entry.author.trim(), entry.date.trim(), title.as_str()];
    let mut out = String::new();
    for part in parts {
        let part = part.trim_end_matches('.').trim_end();
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
        out.push('.');
    }
    out
}

/// Renders each non-empty chapter's bibliography as a Markdown section.
///
/// `Chapter N:` labels are renumbered in output order, so gaps left by the
/// numbering policy do not show.
pub fn render_bibliography_markdown(store: &ChapterStore) -> String {
    let mut out = String::from("# Bibliography\n");
    let mut chapter_number = 1;
    for (label, chapter) in store.chapters() {
        let entries = bibliography_entries(chapter);
        if entries.is_empty() {
            continue;
        }

        let title = match chapter_title(label) {
            Some(title) => {
                let numbered = format!("Chapter {chapter_number}: {title}");
                chapter_number += 1;
                numbered
            }
            None if label.is_empty() => FRONT_MATTER.to_string(),
            None => label.to_string(),
        };
        let _ = write!(out, "\n## {title}\n\n");
        for entry in &entries {
            let _ = writeln!(out, "- {}", format_citation(entry));
        }
    }
    out
}

/// Title part of a `Chapter N: Title` label.
fn chapter_title(label: &str) -> Option<&str> {
    static CHAPTER: OnceLock<Regex> = OnceLock::new();
    let re = CHAPTER.get_or_init(|| {
        Regex::new(r"(?i)^Chapter \d+:\s*(.*)$").expect("Invalid chapter label regex")
    });
    re.captures(label.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}
