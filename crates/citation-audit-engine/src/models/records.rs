use serde::{
    Serialize, Serializer,
    ser::SerializeStruct,
};

/// Snapshot of the chapter/section labels a record was extracted under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadingContext {
    pub chapter: String,
    pub heading2: String,
    pub heading3: String,
    pub heading4: String,
}

/// Reconciliation category a block is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    MainText,
    Footnote,
    ExtractsBibliography,
    ReferencesBibliography,
    Heading,
}

/// The fields that decide whether two citations name the same work.
pub type CitationKey<'a> = (&'a str, &'a str, &'a str, Option<&'a str>);

/// A structured citation extracted from main text or a bibliography listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationRecord {
    pub author: String,
    pub date: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    pub zone: Zone,
    pub heading_context: HeadingContext,
    /// Name of the text shape that produced this record.
    #[serde(skip)]
    pub shape: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub not_in_extracts: bool,
}

impl CitationRecord {
    /// Value-equality key: author, date, title and page, compared verbatim.
    pub fn key(&self) -> CitationKey<'_> {
        (&self.author, &self.date, &self.title, self.page.as_deref())
    }

    /// Whether `self` and `other` describe the same work under exact field equality.
    pub fn same_work(&self, other: &CitationRecord) -> bool {
        self.key() == other.key()
    }
}

/// A footnote kept for the chapter it was attributed to.
#[derive(Debug, Clone, PartialEq)]
pub enum FootnoteRecord {
    /// Footnote text matched one of the fixed footnote shapes.
    Standard {
        id: String,
        author: String,
        date: String,
        title: String,
        shape: &'static str,
        not_in_references: bool,
    },
    /// Footnote text matched nothing and is kept verbatim.
    Freeform { id: String, full_text: String },
}

impl FootnoteRecord {
    pub fn id(&self) -> &str {
        match self {
            FootnoteRecord::Standard { id, .. } | FootnoteRecord::Freeform { id, .. } => id,
        }
    }

    pub fn is_standard_format(&self) -> bool {
        matches!(self, FootnoteRecord::Standard { .. })
    }

    /// Author, date and title, for standard-format footnotes only.
    pub fn citation_fields(&self) -> Option<(&str, &str, &str)> {
        match self {
            FootnoteRecord::Standard {
                author,
                date,
                title,
                ..
            } => Some((author, date, title)),
            FootnoteRecord::Freeform { .. } => None,
        }
    }

    /// Whether a standard footnote names the same work as a listing. Page is not
    /// compared because footnote shapes never capture one.
    pub fn matches_listing(&self, listing: &CitationRecord) -> bool {
        self.citation_fields()
            .is_some_and(|(a, d, t)| a == listing.author && d == listing.date && t == listing.title)
    }

    pub fn set_not_in_references(&mut self, missing: bool) {
        if let FootnoteRecord::Standard {
            not_in_references, ..
        } = self
        {
            *not_in_references = missing;
        }
    }
}

impl Serialize for FootnoteRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FootnoteRecord::Standard {
                id,
                author,
                date,
                title,
                not_in_references,
                ..
            } => {
                let len = if *not_in_references { 6 } else { 5 };
                let mut s = serializer.serialize_struct("FootnoteRecord", len)?;
                s.serialize_field("id", id)?;
                s.serialize_field("author", author)?;
                s.serialize_field("date", date)?;
                s.serialize_field("title", title)?;
                s.serialize_field("standard_format", &true)?;
                if *not_in_references {
                    s.serialize_field("not_in_references", &true)?;
                }
                s.end()
            }
            FootnoteRecord::Freeform { id, full_text } => {
                let mut s = serializer.serialize_struct("FootnoteRecord", 3)?;
                s.serialize_field("id", id)?;
                s.serialize_field("full_text", full_text)?;
                s.serialize_field("standard_format", &false)?;
                s.end()
            }
        }
    }
}

pub const ORPHANED_QUOTE_TITLE: &str = "Orphaned quote without attribution";
pub const ORPHANED_ATTRIBUTION_TEXT: &str = "Orphaned attribution without preceding quote";

/// A quotation accumulated from consecutive blocks and its attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotationRecord {
    pub quote_text: String,
    pub author: String,
    pub date: String,
    pub title: String,
    pub heading_context: HeadingContext,
}

impl QuotationRecord {
    pub fn orphaned_quote(quote_text: String, heading_context: HeadingContext) -> Self {
        Self {
            quote_text,
            author: String::new(),
            date: String::new(),
            title: ORPHANED_QUOTE_TITLE.to_string(),
            heading_context,
        }
    }

    pub fn orphaned_attribution(citation: CitationRecord) -> Self {
        Self {
            quote_text: ORPHANED_ATTRIBUTION_TEXT.to_string(),
            author: citation.author,
            date: citation.date,
            title: citation.title,
            heading_context: citation.heading_context,
        }
    }

    pub fn is_orphaned_quote(&self) -> bool {
        self.author.is_empty() && self.date.is_empty()
    }

    pub fn is_orphaned_attribution(&self) -> bool {
        self.quote_text == ORPHANED_ATTRIBUTION_TEXT
    }
}
