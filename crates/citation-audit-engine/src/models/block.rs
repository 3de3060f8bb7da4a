use serde::{Deserialize, Serialize};

/// Paragraph style of a [`Block`], as reported by the document model provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTag {
    #[default]
    Body,
    Heading2,
    Heading3,
    Heading4,
    /// Any heading outside levels 2-4 (document titles, level 1, level 5+).
    OtherHeading,
    FootnoteBody,
}

impl StyleTag {
    pub fn is_heading(self) -> bool {
        matches!(
            self,
            StyleTag::Heading2 | StyleTag::Heading3 | StyleTag::Heading4 | StyleTag::OtherHeading
        )
    }
}

/// One paragraph-equivalent unit of the document stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub text: String,
    #[serde(default)]
    pub style: StyleTag,
    /// Left indentation in points, when the source carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_indent: Option<f64>,
    /// Identifiers of footnotes referenced from within this paragraph.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnote_refs: Vec<String>,
}

impl Block {
    pub fn new(style: StyleTag, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style,
            left_indent: None,
            footnote_refs: Vec::new(),
        }
    }

    pub fn body(text: impl Into<String>) -> Self {
        Self::new(StyleTag::Body, text)
    }

    pub fn heading2(text: impl Into<String>) -> Self {
        Self::new(StyleTag::Heading2, text)
    }

    pub fn heading3(text: impl Into<String>) -> Self {
        Self::new(StyleTag::Heading3, text)
    }

    pub fn heading4(text: impl Into<String>) -> Self {
        Self::new(StyleTag::Heading4, text)
    }

    pub fn with_indent(mut self, points: f64) -> Self {
        self.left_indent = Some(points);
        self
    }

    pub fn with_footnote_ref(mut self, id: impl Into<String>) -> Self {
        self.footnote_refs.push(id.into());
        self
    }

    pub fn is_indented(&self) -> bool {
        self.left_indent.is_some_and(|indent| indent > 0.0)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A footnote body: the ordered blocks stored under one footnote identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Footnote {
    pub id: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Footnote {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            blocks: vec![Block::new(StyleTag::FootnoteBody, text)],
        }
    }

    /// Flattened footnote text: block texts joined by single spaces.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The whole input of one run: the body stream plus the footnote collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
}

impl DocumentModel {
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            footnotes: Vec::new(),
        }
    }
}
