//! WordprocessingML reading: paragraphs, styles and footnotes out of a
//! `.docx` archive.

use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::models::{Block, DocumentModel, Footnote, StyleTag};

use super::DocumentError;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const FOOTNOTES_PART: &str = "word/footnotes.xml";

/// Footnote types Word uses for its own separator lines.
const RESERVED_FOOTNOTE_TYPES: &[&str] =
    &["separator", "continuationSeparator", "continuationNotice"];

/// Indentation is stored in twentieths of a point.
const TWIPS_PER_POINT: f64 = 20.0;

/// Style id to display name, from `word/styles.xml`.
pub type StyleMap = HashMap<String, String>;

/// Reads the document model out of an opened archive.
pub fn read_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<DocumentModel, DocumentError> {
    let styles = match read_part(archive, STYLES_PART)? {
        Some(xml) => parse_styles(&xml).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable {STYLES_PART}: {e}");
            StyleMap::new()
        }),
        None => StyleMap::new(),
    };
    let document = read_part(archive, DOCUMENT_PART)?
        .ok_or_else(|| DocumentError::MissingPart(DOCUMENT_PART.to_string()))?;
    let footnotes = read_part(archive, FOOTNOTES_PART)?;

    parse_parts(&document, &styles, footnotes.as_deref())
}

/// Builds the document model from already extracted part contents.
pub fn parse_parts(
    document_xml: &str,
    styles: &StyleMap,
    footnotes_xml: Option<&str>,
) -> Result<DocumentModel, DocumentError> {
    let blocks = parse_body(document_xml, styles)?;
    let footnotes = match footnotes_xml {
        Some(xml) => parse_footnotes(xml, styles)?,
        None => Vec::new(),
    };
    log::debug!("Read {} paragraphs and {} footnotes", blocks.len(), footnotes.len());
    Ok(DocumentModel { blocks, footnotes })
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, DocumentError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(Some(String::from_utf8_lossy(strip_bom(&bytes)).into_owned()))
}

/// Parses `w:style` definitions into a style id to name map.
pub fn parse_styles(xml: &str) -> Result<StyleMap, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut styles = StyleMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event().map_err(|e| xml_error(STYLES_PART, e))? {
            Event::Start(e) if local_name(e.name().as_ref()) == b"style" => {
                current_id = attribute(&e, b"styleId");
            }
            Event::Start(e) | Event::Empty(e) if local_name(e.name().as_ref()) == b"name" => {
                if let Some(id) = &current_id
                    && let Some(name) = attribute(&e, b"val")
                {
                    styles.insert(id.clone(), name);
                }
            }
            Event::End(e) if local_name(e.name().as_ref()) == b"style" => current_id = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(styles)
}

fn parse_body(xml: &str, styles: &StyleMap) -> Result<Vec<Block>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = ParagraphReader::new(styles);
    let mut blocks = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| xml_error(DOCUMENT_PART, e))?;
        if matches!(event, Event::Eof) {
            break;
        }
        if let Some(block) = paragraphs.feed(&event) {
            blocks.push(block);
        }
    }

    Ok(blocks)
}

struct FootnoteFrame {
    id: String,
    reserved: bool,
    blocks: Vec<Block>,
}

fn parse_footnotes(xml: &str, styles: &StyleMap) -> Result<Vec<Footnote>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = ParagraphReader::new(styles);
    let mut current: Option<FootnoteFrame> = None;
    let mut footnotes = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| xml_error(FOOTNOTES_PART, e))?;
        match &event {
            Event::Start(e) if local_name(e.name().as_ref()) == b"footnote" => {
                let kind = attribute(e, b"type").unwrap_or_default();
                current = Some(FootnoteFrame {
                    id: attribute(e, b"id").unwrap_or_default(),
                    reserved: RESERVED_FOOTNOTE_TYPES.contains(&kind.as_str()),
                    blocks: Vec::new(),
                });
            }
            Event::End(e) if local_name(e.name().as_ref()) == b"footnote" => {
                if let Some(frame) = current.take()
                    && !frame.reserved
                {
                    footnotes.push(Footnote {
                        id: frame.id,
                        blocks: frame.blocks,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }

        if let Some(block) = paragraphs.feed(&event)
            && let Some(frame) = current.as_mut()
        {
            frame.blocks.push(block);
        }
    }

    Ok(footnotes)
}

/// Accumulates one `w:p` at a time from a stream of XML events.
struct ParagraphReader<'s> {
    styles: &'s StyleMap,
    current: Option<ParagraphBuilder>,
    /// Nesting depth of `w:p` (text boxes can nest paragraphs).
    depth: usize,
    in_properties: bool,
    in_text: bool,
}

#[derive(Default)]
struct ParagraphBuilder {
    text: String,
    style_id: Option<String>,
    left_twips: Option<f64>,
    footnote_refs: Vec<String>,
}

impl ParagraphBuilder {
    fn finish(self, styles: &StyleMap) -> Block {
        let style = match &self.style_id {
            Some(id) => style_tag(styles.get(id).map_or(id.as_str(), String::as_str)),
            None => StyleTag::Body,
        };
        Block {
            text: self.text,
            style,
            left_indent: self.left_twips.map(|twips| twips / TWIPS_PER_POINT),
            footnote_refs: self.footnote_refs,
        }
    }
}

impl<'s> ParagraphReader<'s> {
    fn new(styles: &'s StyleMap) -> Self {
        Self {
            styles,
            current: None,
            depth: 0,
            in_properties: false,
            in_text: false,
        }
    }

    /// Feeds one event; returns the finished block when an outermost `w:p` closes.
    fn feed(&mut self, event: &Event<'_>) -> Option<Block> {
        match event {
            Event::Start(e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"p" => {
                        if self.depth == 0 {
                            self.current = Some(ParagraphBuilder::default());
                        }
                        self.depth += 1;
                    }
                    b"pPr" => self.in_properties = true,
                    b"t" => self.in_text = true,
                    _ => self.element(e),
                }
                None
            }
            Event::Empty(e) => {
                self.element(e);
                None
            }
            Event::Text(e) if self.in_text => {
                self.push_text(&String::from_utf8_lossy(e.as_ref()));
                None
            }
            Event::GeneralRef(e) if self.in_text => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    self.push_text(&resolved);
                }
                None
            }
            Event::End(e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"p" if self.depth > 0 => {
                        self.depth -= 1;
                        if self.depth == 0 {
                            return self.current.take().map(|p| p.finish(self.styles));
                        }
                        None
                    }
                    b"pPr" => {
                        self.in_properties = false;
                        None
                    }
                    b"t" => {
                        self.in_text = false;
                        None
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Handles a non-structural element: style, indentation, breaks, references.
    fn element(&mut self, e: &BytesStart<'_>) {
        let Some(paragraph) = self.current.as_mut() else {
            return;
        };
        let name = e.name();
        match local_name(name.as_ref()) {
            b"pStyle" if self.in_properties => paragraph.style_id = attribute(e, b"val"),
            b"ind" if self.in_properties => {
                paragraph.left_twips = attribute(e, b"left")
                    .or_else(|| attribute(e, b"start"))
                    .and_then(|v| v.parse().ok());
            }
            b"tab" if !self.in_properties => paragraph.text.push('\t'),
            b"br" | b"cr" if !self.in_properties => paragraph.text.push(' '),
            b"footnoteReference" => {
                if let Some(id) = attribute(e, b"id") {
                    paragraph.footnote_refs.push(id);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.current.as_mut() {
            paragraph.text.push_str(text);
        }
    }
}

/// Maps a Word style name (or id when the name is unknown) to a style tag.
pub fn style_tag(style: &str) -> StyleTag {
    let normalized: String = style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    match normalized.as_str() {
        "heading2" => StyleTag::Heading2,
        "heading3" => StyleTag::Heading3,
        "heading4" => StyleTag::Heading4,
        "title" => StyleTag::OtherHeading,
        "footnotetext" => StyleTag::FootnoteBody,
        s if s
            .strip_prefix("heading")
            .is_some_and(|level| !level.is_empty() && level.chars().all(|c| c.is_ascii_digit())) =>
        {
            StyleTag::OtherHeading
        }
        _ => StyleTag::Body,
    }
}

fn xml_error(part: &str, source: quick_xml::Error) -> DocumentError {
    DocumentError::Xml {
        part: part.to_string(),
        source,
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| local_name(a.key.as_ref()) == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}

/// Local part of a namespaced name (`w:p` -> `p`).
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = match entity.strip_prefix("#x") {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => entity.strip_prefix('#')?.parse().ok()?,
    };
    char::from_u32(code).map(|c| c.to_string())
}
