//! Declarative citation shapes.
//!
//! Each [`ShapeRule`] pairs a regular expression with the way its named
//! captures assemble into an author string. Rule tables are ordered: the
//! first rule that matches wins.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Four-digit year with an optional hyphenated range, kept as an opaque string.
const YEAR: &str = r"\d{4}(?:-\d{4})?";

/// How the author of a match is built from the named captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorForm {
    /// `author` capture used as-is.
    Single,
    /// `first_author` and `second_author` joined with " and ".
    Conjunction,
    /// `lastname, firstname` reordered to "Firstname Lastname".
    Inverted,
}

/// One text shape: a name for diagnostics, a pattern and an author form.
///
/// Patterns use the named groups `author`/`first_author`/`second_author`/
/// `firstname`/`lastname`, `date`, `title` and optionally `page`.
#[derive(Debug)]
pub struct ShapeRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub author: AuthorForm,
}

/// `<author> (<year>)[.] <title>[, p. <page>][.]`, anchored to the whole text.
pub const MAIN_TEXT_SHAPES: &[ShapeRule] = &[ShapeRule {
    name: "main_text",
    pattern: r"^(?P<author>[^()]+?)\s*\((?P<date>YEAR)\)\.?\s*(?P<title>.+?)(?:,\s*pp?\.\s*(?P<page>[^\s,.]+))?\s*\.?$",
    author: AuthorForm::Single,
}];

/// Author, parenthesised year, then the title segment up to its terminating period.
pub const BIBLIOGRAPHY_SHAPES: &[ShapeRule] = &[ShapeRule {
    name: "bibliography",
    pattern: r"^(?P<author>[^()]+?)\s*\((?P<date>YEAR)\)\.?\s*(?P<title>[^.]+?)\s*\.",
    author: AuthorForm::Single,
}];

/// Footnote shapes in priority order.
pub const FOOTNOTE_SHAPES: &[ShapeRule] = &[
    // Lastname, Title (Year). Publisher.
    ShapeRule {
        name: "lastname_title_year_publisher",
        pattern: r"^(?P<author>[\w'’-]+),\s+(?P<title>.+?)\s*\((?P<date>YEAR)\)\.\s*(?P<publisher>.+?)\.?$",
        author: AuthorForm::Single,
    },
    // First Last and First Last (Year). Title.
    ShapeRule {
        name: "two_authors_year_title",
        pattern: r"^(?P<first_author>[\w'’.-]+\s+[\w'’-]+)\s+(?:and|&)\s+(?P<second_author>[\w'’.-]+\s+[\w'’-]+)\s*\((?P<date>YEAR)\)\.?\s*(?P<title>.+?)\.?$",
        author: AuthorForm::Conjunction,
    },
    // Lastname, Title Year.
    ShapeRule {
        name: "lastname_title_bare_year",
        pattern: r"^(?P<author>[\w'’-]+),\s+(?P<title>.+?)\s+(?P<date>YEAR)\.?$",
        author: AuthorForm::Single,
    },
    // Lastname, Firstname (Year) Title.
    ShapeRule {
        name: "lastname_firstname_year_title",
        pattern: r"^(?P<lastname>[\w'’-]+),\s+(?P<firstname>[\w'’.-]+(?:\s+[\w'’.-]+)*?)\s*\((?P<date>YEAR)\)\.?\s*(?P<title>.+?)\.?$",
        author: AuthorForm::Inverted,
    },
];

/// Fields captured by a successful shape match, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatch {
    pub shape: &'static str,
    pub author: String,
    pub date: String,
    pub title: String,
    pub page: Option<String>,
}

struct CompiledShape {
    rule: &'static ShapeRule,
    regex: Regex,
}

/// A compiled, ordered rule table.
pub struct ShapeSet {
    shapes: Vec<CompiledShape>,
}

impl ShapeSet {
    pub fn compile(rules: &'static [ShapeRule]) -> Result<Self, regex::Error> {
        let shapes = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern.replace("YEAR", YEAR))
                    .map(|regex| CompiledShape { rule, regex })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { shapes })
    }

    /// Tries every shape in order against the trimmed text; the first hit wins.
    pub fn first_match(&self, text: &str) -> Option<ShapeMatch> {
        let text = text.trim();
        self.shapes.iter().find_map(|shape| {
            let caps = shape.regex.captures(text)?;
            build_match(shape.rule, &caps)
        })
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.shapes.iter().map(|s| s.rule.name)
    }
}

fn build_match(rule: &'static ShapeRule, caps: &Captures<'_>) -> Option<ShapeMatch> {
    let field = |name: &str| caps.name(name).map(|m| trim_capture(m.as_str()));

    let author = match rule.author {
        AuthorForm::Single => field("author")?,
        AuthorForm::Conjunction => {
            format!("{} and {}", field("first_author")?, field("second_author")?)
        }
        AuthorForm::Inverted => format!("{} {}", field("firstname")?, field("lastname")?),
    };
    let date = field("date")?;
    let title = field("title")?;
    if author.is_empty() || title.is_empty() {
        return None;
    }

    Some(ShapeMatch {
        shape: rule.name,
        author,
        date,
        title,
        page: field("page").filter(|p| !p.is_empty()),
    })
}

/// Trims whitespace and list separators around a capture. Periods are kept so
/// that initials survive.
pub fn trim_capture(s: &str) -> String {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'))
        .to_string()
}

/// The three rule tables, compiled once per process.
pub struct ShapeTables {
    pub main_text: ShapeSet,
    pub bibliography: ShapeSet,
    pub footnote: ShapeSet,
}

pub fn tables() -> &'static ShapeTables {
    static TABLES: OnceLock<ShapeTables> = OnceLock::new();
    TABLES.get_or_init(|| ShapeTables {
        main_text: ShapeSet::compile(MAIN_TEXT_SHAPES).expect("Invalid main-text shape"),
        bibliography: ShapeSet::compile(BIBLIOGRAPHY_SHAPES).expect("Invalid bibliography shape"),
        footnote: ShapeSet::compile(FOOTNOTE_SHAPES).expect("Invalid footnote shape"),
    })
}
