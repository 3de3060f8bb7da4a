use serde::{Deserialize, Serialize};

use crate::models::{Block, CitationRecord, HeadingContext, QuotationRecord};

use super::patterns::match_main_text;

/// Separator placed between the paragraphs of a multi-block quotation.
pub const QUOTE_PARAGRAPH_SEPARATOR: &str = "\n";

/// Which idle main-text blocks open a quotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteTrigger {
    /// Any body block that is not itself a citation.
    #[default]
    AnyBody,
    /// Only blocks with a positive left indentation.
    Indented,
}

/// What the accumulator did with one main-text block.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteStep {
    /// Idle and the block is a complete citation: it belongs to the main text.
    Citation(CitationRecord),
    /// The block opened or extended the current quotation.
    Accumulated,
    /// The block was the attribution that closed the quotation.
    Closed(QuotationRecord),
    /// Idle and the block neither cites nor opens a quotation.
    Skipped,
}

#[derive(Debug, Clone, Default)]
enum QuoteState {
    #[default]
    Idle,
    Collecting {
        paragraphs: Vec<String>,
        context: HeadingContext,
    },
}

/// Merges consecutive main-text blocks into one quotation until an
/// attribution line closes it.
///
/// Each accumulated run produces exactly one [`QuotationRecord`]: closing,
/// interrupting and finishing all leave the accumulator idle.
#[derive(Debug, Clone, Default)]
pub struct QuotationAccumulator {
    trigger: QuoteTrigger,
    state: QuoteState,
}

impl QuotationAccumulator {
    pub fn new(trigger: QuoteTrigger) -> Self {
        Self {
            trigger,
            state: QuoteState::Idle,
        }
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, QuoteState::Collecting { .. })
    }

    /// Offers one non-blank main-text block.
    pub fn offer(&mut self, block: &Block, context: &HeadingContext) -> QuoteStep {
        let text = block.text.trim();
        let attribution = match_main_text(text, context);

        match (std::mem::take(&mut self.state), attribution) {
            (QuoteState::Idle, Some(citation)) => QuoteStep::Citation(citation),
            (QuoteState::Idle, None) if self.opens_quotation(block) => {
                self.state = QuoteState::Collecting {
                    paragraphs: vec![text.to_string()],
                    context: context.clone(),
                };
                QuoteStep::Accumulated
            }
            (QuoteState::Idle, None) => QuoteStep::Skipped,
            (
                QuoteState::Collecting {
                    paragraphs,
                    context,
                },
                Some(citation),
            ) => QuoteStep::Closed(QuotationRecord {
                quote_text: paragraphs.join(QUOTE_PARAGRAPH_SEPARATOR),
                author: citation.author,
                date: citation.date,
                title: citation.title,
                heading_context: context,
            }),
            (
                QuoteState::Collecting {
                    mut paragraphs,
                    context,
                },
                None,
            ) => {
                paragraphs.push(text.to_string());
                self.state = QuoteState::Collecting {
                    paragraphs,
                    context,
                };
                QuoteStep::Accumulated
            }
        }
    }

    /// Flushes an in-progress quotation as orphaned (heading or zone boundary).
    pub fn interrupt(&mut self) -> Option<QuotationRecord> {
        match std::mem::take(&mut self.state) {
            QuoteState::Idle => None,
            QuoteState::Collecting {
                paragraphs,
                context,
            } => Some(QuotationRecord::orphaned_quote(
                paragraphs.join(QUOTE_PARAGRAPH_SEPARATOR),
                context,
            )),
        }
    }

    fn opens_quotation(&self, block: &Block) -> bool {
        match self.trigger {
            QuoteTrigger::AnyBody => true,
            QuoteTrigger::Indented => block.is_indented(),
        }
    }
}
