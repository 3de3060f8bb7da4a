use crate::models::{Block, StyleTag, Zone};

use super::headings::{HeadingEvent, ZoneMarker};

/// Decides which reconciliation zone each block belongs to.
///
/// A zone marker heading switches every following non-heading block into
/// its bibliography zone until the next chapter boundary or the next marker.
#[derive(Debug, Clone, Default)]
pub struct ZoneClassifier {
    active: Option<ZoneMarker>,
}

impl ZoneClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the outcome of heading processing to the zone state.
    pub fn apply(&mut self, event: &HeadingEvent) {
        match event {
            HeadingEvent::ChapterStarted { .. } => self.active = None,
            HeadingEvent::ZoneMarker(marker) => self.active = Some(*marker),
            HeadingEvent::SectionChanged | HeadingEvent::None => {}
        }
    }

    pub fn classify(&self, block: &Block) -> Zone {
        if block.style.is_heading() {
            return Zone::Heading;
        }
        if block.style == StyleTag::FootnoteBody {
            return Zone::Footnote;
        }
        match self.active {
            Some(marker) => bibliography_zone(marker),
            None => Zone::MainText,
        }
    }
}

/// Extracts and additional readings both list the works the main text cites.
pub fn bibliography_zone(marker: ZoneMarker) -> Zone {
    match marker {
        ZoneMarker::Extracts | ZoneMarker::AdditionalReadings => Zone::ExtractsBibliography,
        ZoneMarker::References => Zone::ReferencesBibliography,
    }
}
