use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Block, HeadingContext, StyleTag};

/// Which headings open a new chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChapterNumbering {
    /// Only level-2 headings start chapters.
    #[default]
    Headings,
    /// Only a level-3 "Bibliography" heading closes a chapter and opens the next.
    /// Numbered level-2 headings update `heading2` and unnumbered ones are ignored.
    LegacyBibliography,
    /// Both triggers are active.
    Both,
}

/// Bibliography section markers recognised at heading levels 3 and 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneMarker {
    Extracts,
    References,
    AdditionalReadings,
}

impl ZoneMarker {
    pub fn parse(heading: &str) -> Option<Self> {
        match heading.trim().to_lowercase().as_str() {
            "extracts" => Some(ZoneMarker::Extracts),
            "references" => Some(ZoneMarker::References),
            "additional readings" => Some(ZoneMarker::AdditionalReadings),
            _ => None,
        }
    }
}

/// What observing a heading did to the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingEvent {
    /// A new chapter label became current.
    ChapterStarted { label: String },
    /// A bibliography marker was seen; finer heading fields are untouched.
    ZoneMarker(ZoneMarker),
    /// A finer heading field was updated.
    SectionChanged,
    /// Nothing changed: a non-heading block, a heading outside levels 2-4, or
    /// an unnumbered level-2 heading under the legacy policy.
    None,
}

const BIBLIOGRAPHY_HEADING: &str = "bibliography";
const SYNTHETIC_CHAPTER_TITLE: &str = "Next Chapter";
const LEGACY_START_TITLE: &str = "Start";

/// Tracks chapter and section labels while the block stream is walked.
///
/// All counters live on the tracker, so two walks never share numbering.
#[derive(Debug, Clone)]
pub struct HeadingTracker {
    policy: ChapterNumbering,
    context: HeadingContext,
    chapter_number: u32,
    /// A synthetic chapter opened by a bibliography marker that has seen no content yet.
    pending_synthetic: bool,
}

impl HeadingTracker {
    pub fn new(policy: ChapterNumbering) -> Self {
        let mut tracker = Self {
            policy,
            context: HeadingContext::default(),
            chapter_number: 0,
            pending_synthetic: false,
        };
        if policy == ChapterNumbering::LegacyBibliography {
            tracker.chapter_number = 1;
            tracker.context.chapter = chapter_label(1, LEGACY_START_TITLE);
        }
        tracker
    }

    pub fn context(&self) -> &HeadingContext {
        &self.context
    }

    pub fn snapshot(&self) -> HeadingContext {
        self.context.clone()
    }

    pub fn chapter(&self) -> &str {
        &self.context.chapter
    }

    /// Records that a non-heading block was consumed in the current chapter.
    pub fn note_content(&mut self) {
        self.pending_synthetic = false;
    }

    /// Updates the context for one block.
    pub fn observe(&mut self, block: &Block) -> HeadingEvent {
        let text = block.text.trim();
        match block.style {
            StyleTag::Heading2 => self.observe_heading2(text),
            StyleTag::Heading3 | StyleTag::Heading4 => {
                if let Some(marker) = ZoneMarker::parse(text) {
                    return HeadingEvent::ZoneMarker(marker);
                }
                if block.style == StyleTag::Heading3
                    && self.bibliography_closes_chapters()
                    && text.eq_ignore_ascii_case(BIBLIOGRAPHY_HEADING)
                {
                    return self.open_synthetic_chapter();
                }
                if block.style == StyleTag::Heading3 {
                    self.context.heading3 = text.to_string();
                    self.context.heading4.clear();
                } else {
                    self.context.heading4 = text.to_string();
                }
                HeadingEvent::SectionChanged
            }
            _ => HeadingEvent::None,
        }
    }

    fn bibliography_closes_chapters(&self) -> bool {
        matches!(
            self.policy,
            ChapterNumbering::LegacyBibliography | ChapterNumbering::Both
        )
    }

    fn observe_heading2(&mut self, text: &str) -> HeadingEvent {
        let (number, title) = match numbered_heading(text) {
            Some((n, title)) => (Some(n), title),
            None => (None, text.to_string()),
        };

        if self.policy == ChapterNumbering::LegacyBibliography {
            // Only numbered headings are recognised here
            return match number {
                Some(n) => {
                    self.context.heading2 = format!("{n}: {title}");
                    HeadingEvent::SectionChanged
                }
                None => HeadingEvent::None,
            };
        }

        let n = match number {
            Some(n) => n,
            None if self.pending_synthetic => self.chapter_number,
            None => self.next_chapter_number(),
        };
        self.start_chapter(n, &title)
    }

    fn open_synthetic_chapter(&mut self) -> HeadingEvent {
        let event = self.start_chapter(self.next_chapter_number(), SYNTHETIC_CHAPTER_TITLE);
        self.pending_synthetic = true;
        event
    }

    /// Stays at `u32::MAX` once a literal chapter number has reached it.
    fn next_chapter_number(&self) -> u32 {
        self.chapter_number.saturating_add(1)
    }

    fn start_chapter(&mut self, number: u32, title: &str) -> HeadingEvent {
        self.chapter_number = number;
        self.pending_synthetic = false;
        let label = chapter_label(number, title);
        self.context = HeadingContext {
            chapter: label.clone(),
            heading2: label.clone(),
            heading3: String::new(),
            heading4: String::new(),
        };
        log::info!("Starting {label}");
        HeadingEvent::ChapterStarted { label }
    }
}

impl Default for HeadingTracker {
    fn default() -> Self {
        Self::new(ChapterNumbering::default())
    }
}

pub fn chapter_label(number: u32, title: &str) -> String {
    format!("Chapter {number}: {title}")
}

/// Splits a `"<int>. <title>"` heading into its number and title.
fn numbered_heading(text: &str) -> Option<(u32, String)> {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    let re = NUMBERED
        .get_or_init(|| Regex::new(r"^(\d+)\.\s*(.*)$").expect("Invalid numbered heading regex"));
    let caps = re.captures(text)?;
    let number = caps[1].parse().ok()?;
    Some((number, caps[2].trim().to_string()))
}
